//! oc-core: stable foundation for odecalc.
//!
//! Contains:
//! - numeric (finiteness and sign guards for grid parameters)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{CoreError, CoreResult};
pub use numeric::{ensure_finite, ensure_positive};
