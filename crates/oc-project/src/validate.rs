//! Equation validation logic.

use std::collections::HashSet;
use std::fmt;

use oc_expr::{CompiledExpression, ExprError};

use crate::schema::{EquationSpec, Library};

/// Longest accepted equation name, in characters.
pub const MAX_NAME_LEN: usize = 100;
/// Longest accepted expression text, in characters.
pub const MAX_EXPRESSION_LEN: usize = 100;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name must be at most {max} characters (got {len})")]
    NameTooLong { len: usize, max: usize },

    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("h must be positive (got {h})")]
    NonPositiveStep { h: f64 },

    #[error("b must exceed x0 (x0 = {x0}, b = {b})")]
    EmptyInterval { x0: f64, b: f64 },

    #[error("invalid expression: {0}")]
    InvalidExpression(#[from] ExprError),

    #[error("invalid expression: must be at most {max} characters (got {len})")]
    ExpressionTooLong { len: usize, max: usize },

    #[error("invalid expression: must reference both x and y (missing {missing})")]
    MissingVariable { missing: &'static str },

    #[error("Duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("Duplicate ID: {id}")]
    DuplicateId { id: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("equation '{name}': {errors}")]
    Entry {
        name: String,
        errors: ValidationErrors,
    },
}

impl ValidationError {
    /// Input field the error belongs to, for multi-field form reporting.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::EmptyName
            | ValidationError::NameTooLong { .. }
            | ValidationError::DuplicateName { .. } => Some("name"),
            ValidationError::NonFinite { field, .. } => Some(*field),
            ValidationError::NonPositiveStep { .. } => Some("h"),
            ValidationError::EmptyInterval { .. } => Some("b"),
            ValidationError::InvalidExpression(_)
            | ValidationError::ExpressionTooLong { .. }
            | ValidationError::MissingVariable { .. } => Some("func"),
            _ => None,
        }
    }
}

/// Every rule an equation violates, in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    /// Errors reported against one input field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.0.iter().filter(move |e| e.field() == Some(field))
    }

    fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Compile an expression for integration. Requires both `x` and `y` and
/// at most [`MAX_EXPRESSION_LEN`] characters.
pub fn validate_and_compile(expression: &str) -> Result<CompiledExpression, ValidationError> {
    let len = expression.chars().count();
    if len > MAX_EXPRESSION_LEN {
        return Err(ValidationError::ExpressionTooLong {
            len,
            max: MAX_EXPRESSION_LEN,
        });
    }
    let compiled = oc_expr::compile(expression)?;
    let vars = compiled.variables();
    if !vars.x {
        return Err(ValidationError::MissingVariable { missing: "x" });
    }
    if !vars.y {
        return Err(ValidationError::MissingVariable { missing: "y" });
    }
    Ok(compiled)
}

/// Check one equation; all violated rules are reported together.
pub fn validate(spec: &EquationSpec) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name_len = spec.name.chars().count();
    if spec.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    } else if name_len > MAX_NAME_LEN {
        errors.push(ValidationError::NameTooLong {
            len: name_len,
            max: MAX_NAME_LEN,
        });
    }

    if let Err(e) = validate_and_compile(&spec.expression) {
        errors.push(e);
    }

    for (field, value) in [("x0", spec.x0), ("y0", spec.y0), ("b", spec.b)] {
        if !value.is_finite() {
            errors.push(ValidationError::NonFinite { field, value });
        }
    }

    if !spec.h.is_finite() || spec.h <= 0.0 {
        errors.push(ValidationError::NonPositiveStep { h: spec.h });
    }

    if spec.x0.is_finite() && spec.b.is_finite() && spec.b <= spec.x0 {
        errors.push(ValidationError::EmptyInterval {
            x0: spec.x0,
            b: spec.b,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a whole library: version, unique ids and names, every entry.
pub fn validate_library(library: &Library) -> Result<(), ValidationError> {
    if library.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: library.version,
        });
    }

    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for record in &library.equations {
        if !ids.insert(&record.id) {
            return Err(ValidationError::DuplicateId {
                id: record.id.clone(),
            });
        }
        if !names.insert(&record.spec.name) {
            return Err(ValidationError::DuplicateName {
                name: record.spec.name.clone(),
            });
        }
        validate(&record.spec).map_err(|errors| ValidationError::Entry {
            name: record.spec.name.clone(),
            errors,
        })?;
    }

    Ok(())
}
