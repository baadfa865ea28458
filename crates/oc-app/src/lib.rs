//! Shared application service layer for odecalc.
//!
//! Centralizes library editing, run orchestration (compile, integrate both
//! methods, persist, memoize) and result presentation for front-ends.

pub mod error;
pub mod library_service;
pub mod memo;
pub mod payload;
pub mod query;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use library_service::{
    EntryReport, EquationPatch, EquationSummary, add_equation, check_library, get_equation,
    list_equations, load_library, remove_equation, save_library, update_equation,
};
pub use memo::TrajectoryCache;
pub use payload::SolutionPayload;
pub use query::{
    ComparisonRow, RunSummary, comparison_csv, comparison_rows, get_run_summary, trajectory_csv,
};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, RunTimingSummary, Solution, ensure_run, list_runs,
    load_run, solve_memoized, solve_spec,
};
