//! Equation library loading, editing and validation reports.

use std::collections::HashSet;
use std::path::Path;

use oc_project::{EquationRecord, EquationSpec, Library};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// Summary of an equation for listing.
#[derive(Debug, Clone)]
pub struct EquationSummary {
    pub id: String,
    pub name: String,
    pub expression: String,
    pub interval: (f64, f64),
    pub h: f64,
    /// Grid size a run would produce, if the parameters admit one.
    pub samples: Option<usize>,
}

/// Per-entry outcome of [`check_library`].
#[derive(Debug, Clone)]
pub struct EntryReport {
    pub id: String,
    pub name: String,
    pub errors: Vec<String>,
}

impl EntryReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Partial edit applied by [`update_equation`]; `None` keeps the field.
#[derive(Debug, Clone, Default)]
pub struct EquationPatch {
    pub name: Option<String>,
    pub expression: Option<String>,
    pub x0: Option<f64>,
    pub y0: Option<f64>,
    pub b: Option<f64>,
    pub h: Option<f64>,
}

impl EquationPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.expression.is_none()
            && self.x0.is_none()
            && self.y0.is_none()
            && self.b.is_none()
            && self.h.is_none()
    }

    fn apply(self, spec: &mut EquationSpec) {
        if let Some(name) = self.name {
            spec.name = name;
        }
        if let Some(expression) = self.expression {
            spec.expression = expression;
        }
        if let Some(x0) = self.x0 {
            spec.x0 = x0;
        }
        if let Some(y0) = self.y0 {
            spec.y0 = y0;
        }
        if let Some(b) = self.b {
            spec.b = b;
        }
        if let Some(h) = self.h {
            spec.h = h;
        }
    }
}

/// Load and validate an existing library file.
pub fn load_library(path: &Path) -> AppResult<Library> {
    if !path.exists() {
        return Err(AppError::LibraryMissing {
            path: path.to_path_buf(),
        });
    }
    let library = oc_project::load(path)?;
    debug!(path = %path.display(), equations = library.equations.len(), "loaded library");
    Ok(library)
}

pub fn save_library(path: &Path, library: &Library) -> AppResult<()> {
    oc_project::save(path, library)?;
    debug!(path = %path.display(), equations = library.equations.len(), "saved library");
    Ok(())
}

pub fn list_equations(library: &Library) -> Vec<EquationSummary> {
    library
        .equations
        .iter()
        .map(|record| {
            let spec = &record.spec;
            EquationSummary {
                id: record.id.clone(),
                name: spec.name.clone(),
                expression: spec.expression.clone(),
                interval: (spec.x0, spec.b),
                h: spec.h,
                samples: oc_sim::sample_count(spec.x0, spec.h, spec.b).ok(),
            }
        })
        .collect()
}

pub fn get_equation<'a>(library: &'a Library, name: &str) -> AppResult<&'a EquationRecord> {
    library
        .get(name)
        .ok_or_else(|| AppError::EquationNotFound(name.to_string()))
}

/// Validate every entry of a library file and report all problems per
/// entry, including duplicate names and ids.
pub fn check_library(path: &Path) -> AppResult<Vec<EntryReport>> {
    if !path.exists() {
        return Err(AppError::LibraryMissing {
            path: path.to_path_buf(),
        });
    }
    let library = oc_project::load_unchecked(path)?;
    if library.version > oc_project::LATEST_VERSION {
        return Err(oc_project::ValidationError::UnsupportedVersion {
            version: library.version,
        }
        .into());
    }

    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    let reports = library
        .equations
        .iter()
        .map(|record| {
            let mut errors: Vec<String> = match oc_project::validate(&record.spec) {
                Ok(()) => Vec::new(),
                Err(errs) => errs.iter().map(|e| e.to_string()).collect(),
            };
            if !names.insert(record.spec.name.as_str()) {
                errors.push(format!("Duplicate name: {}", record.spec.name));
            }
            if !ids.insert(record.id.as_str()) {
                errors.push(format!("Duplicate ID: {}", record.id));
            }
            EntryReport {
                id: record.id.clone(),
                name: record.spec.name.clone(),
                errors,
            }
        })
        .collect();

    Ok(reports)
}

/// Validate and add an equation, creating the library file if missing.
pub fn add_equation(path: &Path, spec: EquationSpec) -> AppResult<EquationRecord> {
    let mut library = oc_project::load_or_default(path)?;
    let record = library.insert(spec)?.clone();
    save_library(path, &library)?;
    info!(name = %record.spec.name, id = %record.id, "added equation");
    Ok(record)
}

/// Edit an equation in place; the edit is rejected if the result is invalid.
pub fn update_equation(path: &Path, name: &str, patch: EquationPatch) -> AppResult<EquationRecord> {
    if patch.is_empty() {
        return Err(AppError::InvalidInput("nothing to update".to_string()));
    }
    let mut library = load_library(path)?;
    let record = library.update(name, |spec| patch.apply(spec))?.clone();
    save_library(path, &library)?;
    info!(name = %record.spec.name, id = %record.id, "updated equation");
    Ok(record)
}

pub fn remove_equation(path: &Path, name: &str) -> AppResult<EquationRecord> {
    let mut library = load_library(path)?;
    let record = library.remove(name)?;
    save_library(path, &library)?;
    info!(name = %record.spec.name, id = %record.id, "removed equation");
    Ok(record)
}
