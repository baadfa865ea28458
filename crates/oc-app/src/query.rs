//! Query helpers for presenting solved runs.

use oc_sim::{Method, Trajectory};

use crate::error::{AppError, AppResult};
use crate::run_service::Solution;

/// Summary of a solved run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub x_range: (f64, f64),
    pub sample_count: usize,
    pub final_euler: f64,
    pub final_euler_cauchy: f64,
    /// Largest `|y_euler - y_euler_cauchy|` over the grid.
    pub max_abs_difference: f64,
}

/// One line of the side-by-side table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRow {
    pub i: usize,
    pub x: f64,
    pub y_euler: f64,
    pub y_euler_cauchy: f64,
}

impl ComparisonRow {
    pub fn difference(&self) -> f64 {
        self.y_euler_cauchy - self.y_euler
    }
}

pub fn get_run_summary(solution: &Solution) -> AppResult<RunSummary> {
    let (x_first, _) = solution
        .euler
        .points()
        .next()
        .ok_or_else(|| AppError::InvalidInput("No samples in run".to_string()))?;
    let (x_last, final_euler) = solution
        .euler
        .last()
        .ok_or_else(|| AppError::InvalidInput("No samples in run".to_string()))?;
    let (_, final_euler_cauchy) = solution
        .euler_cauchy
        .last()
        .ok_or_else(|| AppError::InvalidInput("No samples in run".to_string()))?;

    let max_abs_difference = comparison_rows(solution)
        .iter()
        .map(|r| r.difference().abs())
        .fold(0.0, f64::max);

    Ok(RunSummary {
        x_range: (x_first, x_last),
        sample_count: solution.euler.len(),
        final_euler,
        final_euler_cauchy,
        max_abs_difference,
    })
}

pub fn comparison_rows(solution: &Solution) -> Vec<ComparisonRow> {
    solution
        .euler
        .points()
        .zip(solution.euler_cauchy.y.iter().copied())
        .enumerate()
        .map(|(i, ((x, y_euler), y_euler_cauchy))| ComparisonRow {
            i,
            x,
            y_euler,
            y_euler_cauchy,
        })
        .collect()
}

/// `x,y` CSV of one trajectory, header included.
pub fn trajectory_csv(trajectory: &Trajectory) -> String {
    let mut csv = String::from("x,y\n");
    for (x, y) in trajectory.points() {
        csv.push_str(&format!("{},{}\n", x, y));
    }
    csv
}

/// CSV with both methods side by side.
pub fn comparison_csv(solution: &Solution) -> String {
    let mut csv = format!(
        "x,{},{}\n",
        Method::Euler.as_str(),
        Method::EulerCauchy.as_str()
    );
    for row in comparison_rows(solution) {
        csv.push_str(&format!("{},{},{}\n", row.x, row.y_euler, row.y_euler_cauchy));
    }
    csv
}
