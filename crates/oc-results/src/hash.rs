//! Content-based hashing for run IDs.

use oc_project::EquationSpec;
use sha2::{Digest, Sha256};

/// Run identity: every spec field (floats by their exact JSON rendering)
/// plus the solver version. Equal inputs always map to the same id.
pub fn compute_run_id(equation: &EquationSpec, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let equation_json = serde_json::to_string(equation).unwrap_or_default();
    hasher.update(equation_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
