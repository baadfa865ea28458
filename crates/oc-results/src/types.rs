//! Result data types.

use oc_project::EquationSpec;
use oc_sim::{Method, Trajectory};
use serde::{Deserialize, Serialize};

use crate::{ResultsError, ResultsResult};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub equation_id: String,
    pub equation: EquationSpec,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub samples: usize,
    pub solver_version: String,
}

impl RunManifest {
    /// Manifest stamped with the current time.
    pub fn new(
        run_id: RunId,
        equation_id: &str,
        equation: &EquationSpec,
        samples: usize,
        solver_version: &str,
    ) -> Self {
        Self {
            run_id,
            equation_id: equation_id.to_string(),
            equation: equation.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            samples,
            solver_version: solver_version.to_string(),
        }
    }
}

/// One grid point with the ordinate from each method.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SampleRecord {
    pub i: usize,
    pub x: f64,
    pub y_euler: f64,
    pub y_euler_cauchy: f64,
}

/// Zip two trajectories computed on the same grid into sample records.
pub fn records_from(euler: &Trajectory, euler_cauchy: &Trajectory) -> ResultsResult<Vec<SampleRecord>> {
    if euler.len() != euler_cauchy.len() {
        return Err(ResultsError::GridMismatch {
            message: format!("{} vs {} samples", euler.len(), euler_cauchy.len()),
        });
    }
    if let Some(i) = (0..euler.len()).find(|&i| euler.x[i].to_bits() != euler_cauchy.x[i].to_bits())
    {
        return Err(ResultsError::GridMismatch {
            message: format!("abscissae differ at sample {}", i),
        });
    }

    Ok((0..euler.len())
        .map(|i| SampleRecord {
            i,
            x: euler.x[i],
            y_euler: euler.y[i],
            y_euler_cauchy: euler_cauchy.y[i],
        })
        .collect())
}

/// Split sample records back into `(euler, euler_cauchy)` trajectories.
pub fn trajectories_from(records: &[SampleRecord]) -> (Trajectory, Trajectory) {
    let x: Vec<f64> = records.iter().map(|r| r.x).collect();
    let euler = Trajectory {
        method: Method::Euler,
        x: x.clone(),
        y: records.iter().map(|r| r.y_euler).collect(),
    };
    let euler_cauchy = Trajectory {
        method: Method::EulerCauchy,
        x,
        y: records.iter().map(|r| r.y_euler_cauchy).collect(),
    };
    (euler, euler_cauchy)
}
