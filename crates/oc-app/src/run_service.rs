//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use oc_project::EquationSpec;
use oc_results::{RunManifest, RunStore};
use oc_sim::{IntegrateOptions, Method, Trajectory};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::library_service;
use crate::memo::TrajectoryCache;

/// Options for running an equation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub solver_version: String,
    /// Upper bound on grid size, checked before allocating.
    pub max_samples: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: "0.1.0".to_string(),
            max_samples: IntegrateOptions::default().max_samples,
        }
    }
}

/// Request to run one library equation.
pub struct RunRequest<'a> {
    pub library_path: &'a Path,
    pub equation_name: &'a str,
    pub options: RunOptions,
}

/// Both trajectories of one run, on a shared grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub euler: Trajectory,
    pub euler_cauchy: Trajectory,
}

impl Solution {
    pub fn trajectory(&self, method: Method) -> &Trajectory {
        match method {
            Method::Euler => &self.euler,
            Method::EulerCauchy => &self.euler_cauchy,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub compile_time_s: f64,
    pub integrate_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub solution: Solution,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

/// Validate, compile and integrate with both methods.
///
/// The two methods share nothing mutable and run on the rayon pool in
/// parallel. Any failure aborts the whole solve.
pub fn solve_spec(spec: &EquationSpec, max_samples: usize) -> AppResult<Solution> {
    solve_spec_timed(spec, max_samples, &mut RunTimingSummary::default())
}

fn solve_spec_timed(
    spec: &EquationSpec,
    max_samples: usize,
    timing: &mut RunTimingSummary,
) -> AppResult<Solution> {
    oc_project::validate(spec)?;

    let compile_started = Instant::now();
    let f = oc_project::validate_and_compile(&spec.expression)?;
    timing.compile_time_s = compile_started.elapsed().as_secs_f64();
    debug!(expression = %spec.expression, "compiled right-hand side");

    let opts = IntegrateOptions { max_samples };
    let integrate_started = Instant::now();
    let (euler, euler_cauchy) = rayon::join(
        || oc_sim::integrate_with_options(Method::Euler, &f, spec.x0, spec.y0, spec.h, spec.b, &opts),
        || {
            oc_sim::integrate_with_options(
                Method::EulerCauchy,
                &f,
                spec.x0,
                spec.y0,
                spec.h,
                spec.b,
                &opts,
            )
        },
    );
    timing.integrate_time_s = integrate_started.elapsed().as_secs_f64();

    let solution = Solution {
        euler: euler?,
        euler_cauchy: euler_cauchy?,
    };
    debug!(
        samples = solution.euler.len(),
        elapsed_s = timing.integrate_time_s,
        "integrated"
    );
    Ok(solution)
}

/// [`solve_spec`] through an in-process memo keyed by run id.
pub fn solve_memoized(
    cache: &TrajectoryCache,
    spec: &EquationSpec,
    options: &RunOptions,
) -> AppResult<std::sync::Arc<Solution>> {
    let key = oc_results::compute_run_id(spec, &options.solver_version);
    cache.get_or_compute(&key, || solve_spec(spec, options.max_samples))
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    let library = library_service::load_library(request.library_path)?;
    let record = library_service::get_equation(&library, request.equation_name)?;
    let spec = &record.spec;

    let run_id = oc_results::compute_run_id(spec, &request.options.solver_version);
    let store = RunStore::for_library(request.library_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        let (euler, euler_cauchy) = store.load_trajectories(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.total_time_s = started.elapsed().as_secs_f64();
        info!(name = %spec.name, %run_id, "loaded cached run");

        return Ok(RunResponse {
            run_id,
            manifest,
            solution: Solution {
                euler,
                euler_cauchy,
            },
            loaded_from_cache: true,
            timing,
        });
    }

    info!(name = %spec.name, expression = %spec.expression, h = spec.h, "running equation");
    let solution = solve_spec_timed(spec, request.options.max_samples, &mut timing)?;

    let save_started = Instant::now();
    let records = oc_results::records_from(&solution.euler, &solution.euler_cauchy)?;
    let manifest = RunManifest::new(
        run_id.clone(),
        &record.id,
        spec,
        records.len(),
        &request.options.solver_version,
    );
    store.save_run(&manifest, &records)?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();
    info!(%run_id, samples = records.len(), total_s = timing.total_time_s, "run completed");

    Ok(RunResponse {
        run_id,
        manifest,
        solution,
        loaded_from_cache: false,
        timing,
    })
}

/// List runs for an equation, most recent first.
pub fn list_runs(library_path: &Path, equation_name: &str) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::for_library(library_path)?;

    let mut runs = store.list_runs(equation_name)?;
    runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(runs)
}

/// Load a specific run.
pub fn load_run(library_path: &Path, run_id: &str) -> AppResult<(RunManifest, Solution)> {
    let store = RunStore::for_library(library_path)?;

    let manifest = store.load_manifest(run_id)?;
    let (euler, euler_cauchy) = store.load_trajectories(run_id)?;
    if euler.len() != manifest.samples {
        return Err(AppError::Results(format!(
            "run {} has {} samples, manifest records {}",
            run_id,
            euler.len(),
            manifest.samples
        )));
    }

    Ok((
        manifest,
        Solution {
            euler,
            euler_cauchy,
        },
    ))
}
