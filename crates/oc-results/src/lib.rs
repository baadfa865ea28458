//! oc-results: content-addressed run storage.
//!
//! Provides:
//! - `compute_run_id`: SHA-256 over the equation and solver version
//! - `RunStore`: `manifest.json` + `samples.jsonl` per run directory
//! - `RunManifest` / `SampleRecord`: on-disk data types

pub mod hash;
pub mod store;
pub mod types;

pub use hash::compute_run_id;
pub use store::RunStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    #[error("Trajectories do not share a grid: {message}")]
    GridMismatch { message: String },
}
