//! Equation library schema definitions.

use serde::{Deserialize, Serialize};

use crate::LATEST_VERSION;

/// One registered problem: `y' = func(x, y)`, `y(x0) = y0` on `[x0, b]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquationSpec {
    pub name: String,
    #[serde(rename = "func", alias = "expression")]
    pub expression: String,
    pub x0: f64,
    pub y0: f64,
    pub b: f64,
    pub h: f64,
}

/// Stored library entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquationRecord {
    pub id: String,
    #[serde(flatten)]
    pub spec: EquationSpec,
}

impl EquationRecord {
    /// Wrap a spec with a fresh v4 id.
    pub fn new(spec: EquationSpec) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            spec,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Library {
    pub version: u32,
    #[serde(default)]
    pub equations: Vec<EquationRecord>,
}

impl Default for Library {
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            equations: Vec::new(),
        }
    }
}
