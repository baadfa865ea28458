//! Error types for the oc-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// as strings, giving front-ends one error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Library error: {0}")]
    Library(String),

    #[error("Library file not found: {path}")]
    LibraryMissing { path: PathBuf },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Equation not found: {0}")]
    EquationNotFound(String),

    #[error("Invalid expression: {0}")]
    Expression(String),

    #[error("Integration error: {0}")]
    Integration(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for oc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<oc_project::ProjectError> for AppError {
    fn from(err: oc_project::ProjectError) -> Self {
        match err {
            oc_project::ProjectError::NotFound { name } => AppError::EquationNotFound(name),
            oc_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Library(other.to_string()),
        }
    }
}

impl From<oc_project::ValidationError> for AppError {
    fn from(err: oc_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<oc_project::ValidationErrors> for AppError {
    fn from(err: oc_project::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<oc_expr::ExprError> for AppError {
    fn from(err: oc_expr::ExprError) -> Self {
        AppError::Expression(err.to_string())
    }
}

impl From<oc_sim::IntegrationError> for AppError {
    fn from(err: oc_sim::IntegrationError) -> Self {
        AppError::Integration(err.to_string())
    }
}

impl From<oc_results::ResultsError> for AppError {
    fn from(err: oc_results::ResultsError) -> Self {
        match err {
            oc_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
