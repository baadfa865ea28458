//! Serialized single-equation resource: inputs plus both trajectories.

use oc_project::EquationSpec;
use serde::{Deserialize, Serialize};

use crate::run_service::Solution;

/// `x1_res`/`y1_res` hold the Euler samples, `x2_res`/`y2_res` the
/// Euler-Cauchy samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub func: String,
    pub x0: f64,
    pub y0: f64,
    pub b: f64,
    pub h: f64,
    pub x1_res: Vec<f64>,
    pub y1_res: Vec<f64>,
    pub x2_res: Vec<f64>,
    pub y2_res: Vec<f64>,
}

impl SolutionPayload {
    pub fn new(id: Option<&str>, spec: &EquationSpec, solution: &Solution) -> Self {
        Self {
            id: id.map(str::to_string),
            name: spec.name.clone(),
            func: spec.expression.clone(),
            x0: spec.x0,
            y0: spec.y0,
            b: spec.b,
            h: spec.h,
            x1_res: solution.euler.x.clone(),
            y1_res: solution.euler.y.clone(),
            x2_res: solution.euler_cauchy.x.clone(),
            y2_res: solution.euler_cauchy.y.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
