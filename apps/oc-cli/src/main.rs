use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::Level;

use oc_app::{
    AppError, AppResult, EquationPatch, RunOptions, RunRequest, RunTimingSummary, Solution,
    SolutionPayload, library_service, query, run_service,
};
use oc_project::EquationSpec;
use oc_sim::Method;

#[derive(Parser)]
#[command(name = "oc-cli")]
#[command(about = "odecalc CLI - Euler and Euler-Cauchy solutions of y' = f(x, y)", long_about = None)]
struct Cli {
    /// Log more (repeat for trace output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every equation in a library file
    Validate {
        /// Path to the library file (.yaml, .yml or .json)
        library_path: PathBuf,
    },
    /// List equations in a library
    List {
        /// Path to the library file
        library_path: PathBuf,
    },
    /// Add an equation (creates the library if missing)
    Add {
        /// Path to the library file
        library_path: PathBuf,
        #[arg(long)]
        name: String,
        /// Right-hand side f(x, y)
        #[arg(long)]
        func: String,
        #[arg(long, allow_negative_numbers = true)]
        x0: f64,
        #[arg(long, allow_negative_numbers = true)]
        y0: f64,
        #[arg(long, allow_negative_numbers = true)]
        b: f64,
        #[arg(long, allow_negative_numbers = true)]
        h: f64,
    },
    /// Edit fields of an existing equation
    Update {
        /// Path to the library file
        library_path: PathBuf,
        /// Current name of the equation
        name: String,
        #[arg(long = "rename")]
        new_name: Option<String>,
        #[arg(long)]
        func: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        x0: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        y0: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        b: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        h: Option<f64>,
    },
    /// Remove an equation
    Remove {
        /// Path to the library file
        library_path: PathBuf,
        name: String,
    },
    /// Solve a library equation with both methods
    Solve {
        /// Path to the library file
        library_path: PathBuf,
        name: String,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Print the JSON payload instead of a table
        #[arg(long)]
        json: bool,
        /// Maximum grid size
        #[arg(long, default_value_t = 1_000_000)]
        max_samples: usize,
    },
    /// Solve an equation given on the command line, without a library
    Eval {
        #[arg(long)]
        func: String,
        #[arg(long, allow_negative_numbers = true)]
        x0: f64,
        #[arg(long, allow_negative_numbers = true)]
        y0: f64,
        #[arg(long, allow_negative_numbers = true)]
        b: f64,
        #[arg(long, allow_negative_numbers = true)]
        h: f64,
        /// Print only one method as x,y CSV
        #[arg(long, value_enum)]
        method: Option<MethodArg>,
    },
    /// List cached runs for an equation
    Runs {
        /// Path to the library file
        library_path: PathBuf,
        name: String,
    },
    /// Export one trajectory of a cached run as CSV
    Export {
        /// Path to the library file
        library_path: PathBuf,
        run_id: String,
        #[arg(long, value_enum)]
        method: MethodArg,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Euler,
    EulerCauchy,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Euler => Method::Euler,
            MethodArg::EulerCauchy => Method::EulerCauchy,
        }
    }
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { library_path } => cmd_validate(&library_path),
        Commands::List { library_path } => cmd_list(&library_path),
        Commands::Add {
            library_path,
            name,
            func,
            x0,
            y0,
            b,
            h,
        } => cmd_add(
            &library_path,
            EquationSpec {
                name,
                expression: func,
                x0,
                y0,
                b,
                h,
            },
        ),
        Commands::Update {
            library_path,
            name,
            new_name,
            func,
            x0,
            y0,
            b,
            h,
        } => cmd_update(
            &library_path,
            &name,
            EquationPatch {
                name: new_name,
                expression: func,
                x0,
                y0,
                b,
                h,
            },
        ),
        Commands::Remove { library_path, name } => cmd_remove(&library_path, &name),
        Commands::Solve {
            library_path,
            name,
            no_cache,
            json,
            max_samples,
        } => cmd_solve(&library_path, &name, !no_cache, json, max_samples),
        Commands::Eval {
            func,
            x0,
            y0,
            b,
            h,
            method,
        } => cmd_eval(
            EquationSpec {
                name: "eval".to_string(),
                expression: func,
                x0,
                y0,
                b,
                h,
            },
            method.map(Method::from),
        ),
        Commands::Runs { library_path, name } => cmd_runs(&library_path, &name),
        Commands::Export {
            library_path,
            run_id,
            method,
            output,
        } => cmd_export(&library_path, &run_id, method.into(), output.as_deref()),
    }
}

fn cmd_validate(library_path: &Path) -> AppResult<()> {
    println!("Validating library: {}", library_path.display());
    let reports = library_service::check_library(library_path)?;

    let mut invalid = 0usize;
    for report in &reports {
        if report.is_valid() {
            println!("  ✓ {}", report.name);
        } else {
            invalid += 1;
            println!("  ✗ {} ({})", report.name, report.id);
            for err in &report.errors {
                println!("      - {}", err);
            }
        }
    }

    if invalid > 0 {
        return Err(AppError::Validation(format!(
            "{} of {} equations are invalid",
            invalid,
            reports.len()
        )));
    }
    println!("✓ Library is valid ({} equations)", reports.len());
    Ok(())
}

fn cmd_list(library_path: &Path) -> AppResult<()> {
    let library = library_service::load_library(library_path)?;
    let equations = library_service::list_equations(&library);

    if equations.is_empty() {
        println!("No equations found in library");
    } else {
        println!("Equations in library:");
        for eq in equations {
            let samples = eq
                .samples
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string());
            println!(
                "  {} - y' = {}  on [{}, {}], h = {} ({} samples)",
                eq.name, eq.expression, eq.interval.0, eq.interval.1, eq.h, samples
            );
        }
    }
    Ok(())
}

fn cmd_add(library_path: &Path, spec: EquationSpec) -> AppResult<()> {
    let record = library_service::add_equation(library_path, spec)?;
    println!("✓ Added '{}' ({})", record.spec.name, record.id);
    Ok(())
}

fn cmd_update(library_path: &Path, name: &str, patch: EquationPatch) -> AppResult<()> {
    let record = library_service::update_equation(library_path, name, patch)?;
    println!("✓ Updated '{}' ({})", record.spec.name, record.id);
    Ok(())
}

fn cmd_remove(library_path: &Path, name: &str) -> AppResult<()> {
    let record = library_service::remove_equation(library_path, name)?;
    println!("✓ Removed '{}' ({})", record.spec.name, record.id);
    Ok(())
}

fn cmd_solve(
    library_path: &Path,
    name: &str,
    use_cache: bool,
    json: bool,
    max_samples: usize,
) -> AppResult<()> {
    let request = RunRequest {
        library_path,
        equation_name: name,
        options: RunOptions {
            use_cache,
            max_samples,
            ..RunOptions::default()
        },
    };
    let response = run_service::ensure_run(&request)?;

    if json {
        let payload = SolutionPayload::new(
            Some(response.manifest.equation_id.as_str()),
            &response.manifest.equation,
            &response.solution,
        );
        println!("{}", payload.to_json_pretty()?);
        return Ok(());
    }

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Solved: {}", response.run_id);
    }
    print_table(&response.solution)?;
    print_timing_summary(&response.timing);
    Ok(())
}

fn cmd_eval(spec: EquationSpec, method: Option<Method>) -> AppResult<()> {
    let solution = run_service::solve_spec(&spec, RunOptions::default().max_samples)?;

    match method {
        Some(method) => print!("{}", query::trajectory_csv(solution.trajectory(method))),
        None => print_table(&solution)?,
    }
    Ok(())
}

fn cmd_runs(library_path: &Path, name: &str) -> AppResult<()> {
    let runs = run_service::list_runs(library_path, name)?;

    if runs.is_empty() {
        println!("No cached runs found for equation: {}", name);
    } else {
        println!("Cached runs for equation '{}':", name);
        for manifest in runs {
            println!(
                "  {} ({}, {} samples, h = {})",
                manifest.run_id, manifest.timestamp, manifest.samples, manifest.equation.h
            );
        }
    }
    Ok(())
}

fn cmd_export(
    library_path: &Path,
    run_id: &str,
    method: Method,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, solution) = run_service::load_run(library_path, run_id)?;
    let trajectory = solution.trajectory(method);
    let csv = query::trajectory_csv(trajectory);

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} {} samples to {}",
            trajectory.len(),
            method.label(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn print_table(solution: &Solution) -> AppResult<()> {
    println!(
        "{:>6}  {:>14}  {:>16}  {:>16}  {:>12}",
        "i",
        "x",
        Method::Euler.label(),
        Method::EulerCauchy.label(),
        "diff"
    );
    for row in query::comparison_rows(solution) {
        println!(
            "{:>6}  {:>14.6}  {:>16.8}  {:>16.8}  {:>12.3e}",
            row.i,
            row.x,
            row.y_euler,
            row.y_euler_cauchy,
            row.difference()
        );
    }

    let summary = query::get_run_summary(solution)?;
    println!("\nRun Summary:");
    println!("  Samples: {}", summary.sample_count);
    println!("  x range: {} - {}", summary.x_range.0, summary.x_range.1);
    println!(
        "  y(end): Euler {:.8}, Euler-Cauchy {:.8}",
        summary.final_euler, summary.final_euler_cauchy
    );
    println!("  Max |difference|: {:.3e}", summary.max_abs_difference);
    Ok(())
}

fn print_timing_summary(timing: &RunTimingSummary) {
    println!("\nTiming summary:");
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache load: {:.3}s", timing.load_cache_time_s);
    } else {
        println!("  Compile:   {:.3}s", timing.compile_time_s);
        println!("  Integrate: {:.3}s", timing.integrate_time_s);
        println!("  Save:      {:.3}s", timing.save_time_s);
    }
    println!("  Total:     {:.3}s", timing.total_time_s);
}
