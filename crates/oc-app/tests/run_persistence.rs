use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use oc_app::{
    AppError, EquationPatch, RunOptions, RunRequest, add_equation, check_library, list_equations,
    list_runs, load_library, load_run, remove_equation, run_service, update_equation,
};
use oc_project::EquationSpec;
use oc_results::RunStore;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn growth() -> EquationSpec {
    EquationSpec {
        name: "growth".to_string(),
        expression: "x*y".to_string(),
        x0: 0.0,
        y0: 1.0,
        b: 1.0,
        h: 0.5,
    }
}

#[test]
fn run_persists_and_reloads_from_cache() {
    let dir = unique_temp_dir("oc_app_run");
    let library_path = dir.join("library.yaml");
    add_equation(&library_path, growth()).expect("add");

    let request = RunRequest {
        library_path: &library_path,
        equation_name: "growth",
        options: RunOptions::default(),
    };

    let first = run_service::ensure_run(&request).expect("first run failed");
    assert!(!first.loaded_from_cache);
    assert_eq!(first.solution.euler.y, vec![1.0, 1.0, 1.25]);

    let store = RunStore::for_library(&library_path).expect("store");
    assert!(store.has_run(&first.run_id));

    let second = run_service::ensure_run(&request).expect("second run failed");
    assert!(second.loaded_from_cache);
    assert_eq!(second.run_id, first.run_id);
    assert_eq!(second.solution, first.solution);

    let no_cache = RunRequest {
        options: RunOptions {
            use_cache: false,
            ..RunOptions::default()
        },
        ..request
    };
    let third = run_service::ensure_run(&no_cache).expect("forced run failed");
    assert!(!third.loaded_from_cache);
    assert_eq!(third.solution, first.solution);

    let runs = list_runs(&library_path, "growth").expect("list runs");
    assert_eq!(runs.len(), 1);
    let (manifest, solution) = load_run(&library_path, &first.run_id).expect("load run");
    assert_eq!(manifest.equation, growth());
    assert_eq!(solution, first.solution);
}

#[test]
fn editing_an_equation_changes_its_run_id() {
    let dir = unique_temp_dir("oc_app_edit");
    let library_path = dir.join("library.json");
    add_equation(&library_path, growth()).expect("add");

    let request = RunRequest {
        library_path: &library_path,
        equation_name: "growth",
        options: RunOptions::default(),
    };
    let before = run_service::ensure_run(&request).unwrap();

    let patch = EquationPatch {
        h: Some(0.25),
        ..Default::default()
    };
    update_equation(&library_path, "growth", patch).expect("update");
    let after = run_service::ensure_run(&request).unwrap();
    assert_ne!(before.run_id, after.run_id);
    assert_eq!(after.solution.euler.len(), 5);
    assert_eq!(list_runs(&library_path, "growth").unwrap().len(), 2);
}

#[test]
fn library_crud_rules() {
    let dir = unique_temp_dir("oc_app_crud");
    let library_path = dir.join("library.yaml");

    let record = add_equation(&library_path, growth()).expect("add");
    assert!(matches!(
        add_equation(&library_path, growth()),
        Err(AppError::Validation(_))
    ));

    let bad = EquationPatch {
        expression: Some("x,y".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        update_equation(&library_path, "growth", bad),
        Err(AppError::Validation(_))
    ));
    assert!(update_equation(&library_path, "growth", EquationPatch::default()).is_err());

    let library = load_library(&library_path).unwrap();
    let summaries = list_equations(&library);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, record.id);
    assert_eq!(summaries[0].expression, "x*y");
    assert_eq!(summaries[0].samples, Some(3));

    remove_equation(&library_path, "growth").expect("remove");
    assert!(matches!(
        remove_equation(&library_path, "growth"),
        Err(AppError::EquationNotFound(_))
    ));
    assert!(load_library(&library_path).unwrap().equations.is_empty());
}

#[test]
fn check_library_reports_every_entry() {
    let dir = unique_temp_dir("oc_app_check");
    let library_path = dir.join("library.yaml");
    fs::write(
        &library_path,
        "version: 1\nequations:\n  - {id: a, name: ok, func: x + y, x0: 0, y0: 1, b: 1, h: 0.1}\n  - {id: b, name: bad, func: '1', x0: 0, y0: 1, b: 0, h: 0}\n  - {id: c, name: ok, func: x*y, x0: 0, y0: 1, b: 1, h: 0.1}\n",
    )
    .unwrap();

    assert!(load_library(&library_path).is_err());

    let reports = check_library(&library_path).expect("check");
    assert_eq!(reports.len(), 3);
    assert!(reports[0].is_valid());
    assert_eq!(reports[1].errors.len(), 3, "{:?}", reports[1].errors);
    assert!(reports[2].errors[0].starts_with("Duplicate name"));
}

#[test]
fn missing_equation_and_library() {
    let dir = unique_temp_dir("oc_app_missing");
    let library_path = dir.join("library.yaml");
    let request = RunRequest {
        library_path: &library_path,
        equation_name: "growth",
        options: RunOptions::default(),
    };
    assert!(matches!(
        run_service::ensure_run(&request),
        Err(AppError::LibraryMissing { .. })
    ));

    add_equation(&library_path, growth()).unwrap();
    let request = RunRequest {
        equation_name: "nope",
        ..request
    };
    assert!(matches!(
        run_service::ensure_run(&request),
        Err(AppError::EquationNotFound(_))
    ));
}

#[test]
fn cached_run_is_bit_identical_to_fresh_run() {
    let dir = unique_temp_dir("oc_app_bits");
    let library_path = dir.join("library.json");
    add_equation(
        &library_path,
        EquationSpec {
            name: "quadratic".to_string(),
            expression: "y - x^2 + 1".to_string(),
            x0: 0.0,
            y0: 0.5,
            b: 2.0,
            h: 0.011,
        },
    )
    .expect("add");

    let request = RunRequest {
        library_path: &library_path,
        equation_name: "quadratic",
        options: RunOptions::default(),
    };
    let fresh = run_service::ensure_run(&request).expect("fresh run");
    let cached = run_service::ensure_run(&request).expect("cached run");
    assert!(!fresh.loaded_from_cache);
    assert!(cached.loaded_from_cache);

    let bits = |v: &[f64]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
    for (a, b) in [
        (&fresh.solution.euler, &cached.solution.euler),
        (&fresh.solution.euler_cauchy, &cached.solution.euler_cauchy),
    ] {
        assert_eq!(a.len(), 183);
        assert_eq!(bits(&a.x), bits(&b.x));
        assert_eq!(bits(&a.y), bits(&b.y));
    }
}
