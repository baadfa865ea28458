//! Fixed-step integration of `y' = f(x, y)` for odecalc.
//!
//! Provides:
//! - `Slope` trait for right-hand sides (compiled expressions or closures)
//! - Step rules: explicit Euler and Euler-Cauchy (Heun)
//! - One shared stepping routine producing a `Trajectory`

pub mod error;
pub mod integrator;
pub mod model;
pub mod sim;

// Re-exports for public API
pub use error::{IntegrationError, SimResult};
pub use integrator::{Euler, EulerCauchy, StepRule};
pub use model::{FnSlope, Slope};
pub use sim::{
    IntegrateOptions, Method, Trajectory, euler, euler_cauchy, integrate, integrate_with_options,
    sample_count,
};
