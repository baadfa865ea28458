//! Error types for integration runs.

use oc_expr::EvalError;
use thiserror::Error;

/// Errors encountered while building a trajectory. No partial data is
/// returned alongside any of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Evaluation failed at step {at_step} (x = {x}, y = {y}): {source}")]
    Evaluation {
        at_step: usize,
        x: f64,
        y: f64,
        #[source]
        source: EvalError,
    },

    #[error("Non-finite value at step {at_step}: {value}")]
    NonFinite { at_step: usize, value: f64 },

    #[error("Grid needs {samples} samples, limit is {max_samples}")]
    TooManySamples { samples: usize, max_samples: usize },
}

impl IntegrationError {
    /// Index of the sample whose computation failed, if the run got that far.
    pub fn at_step(&self) -> Option<usize> {
        match self {
            IntegrationError::Evaluation { at_step, .. }
            | IntegrationError::NonFinite { at_step, .. } => Some(*at_step),
            _ => None,
        }
    }
}

pub type SimResult<T> = Result<T, IntegrationError>;

impl From<oc_core::CoreError> for IntegrationError {
    fn from(e: oc_core::CoreError) -> Self {
        match e {
            oc_core::CoreError::InvalidArg { what } | oc_core::CoreError::NonFinite { what, .. } => {
                IntegrationError::InvalidArg { what }
            }
        }
    }
}
