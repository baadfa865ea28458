use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use oc_project::{
    EquationSpec, Library, ProjectError, ValidationError, load, load_or_default, save,
};

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

fn sample_library() -> Library {
    let mut library = Library::default();
    library
        .insert(EquationSpec {
            name: "growth".to_string(),
            expression: "x*y".to_string(),
            x0: 0.0,
            y0: 1.0,
            b: 1.0,
            h: 0.5,
        })
        .expect("insert growth");
    library
        .insert(EquationSpec {
            name: "decay".to_string(),
            expression: "-2*y + 0*x".to_string(),
            x0: 0.0,
            y0: 3.0,
            b: 2.0,
            h: 0.1,
        })
        .expect("insert decay");
    library
}

#[test]
fn yaml_roundtrip() {
    let dir = unique_temp_dir("oc_project_yaml");
    let path = dir.join("library.yaml");
    let library = sample_library();

    save(&path, &library).expect("save yaml");
    let loaded = load(&path).expect("load yaml");
    assert_eq!(loaded, library);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("func:"), "{text}");
    assert!(!text.contains("expression:"), "{text}");
}

#[test]
fn json_roundtrip() {
    let dir = unique_temp_dir("oc_project_json");
    let path = dir.join("library.json");
    let library = sample_library();

    save(&path, &library).expect("save json");
    let loaded = load(&path).expect("load json");
    assert_eq!(loaded, library);
}

#[test]
fn hand_written_yaml_loads() {
    let dir = unique_temp_dir("oc_project_hand");
    let path = dir.join("library.yml");
    fs::write(
        &path,
        "version: 1\nequations:\n  - id: a1\n    name: lin\n    func: x + y\n    x0: 0\n    y0: 1\n    b: 1\n    h: 0.25\n",
    )
    .unwrap();

    let library = load(&path).expect("load");
    let record = library.get("lin").expect("entry");
    assert_eq!(record.id, "a1");
    assert_eq!(record.spec.expression, "x + y");
    assert_eq!(record.spec.h, 0.25);
}

#[test]
fn duplicate_names_rejected_on_load() {
    let dir = unique_temp_dir("oc_project_dup");
    let path = dir.join("library.yaml");
    fs::write(
        &path,
        "version: 1\nequations:\n  - {id: a, name: same, func: x*y, x0: 0, y0: 1, b: 1, h: 0.5}\n  - {id: b, name: same, func: x+y, x0: 0, y0: 1, b: 1, h: 0.5}\n",
    )
    .unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(
        err,
        ProjectError::Validation(ValidationError::DuplicateName { .. })
    ));
}

#[test]
fn invalid_entry_rejected_on_load() {
    let dir = unique_temp_dir("oc_project_invalid");
    let path = dir.join("library.json");
    fs::write(
        &path,
        r#"{"version":1,"equations":[{"id":"a","name":"bad","func":"x,y","x0":0,"y0":1,"b":1,"h":0}]}"#,
    )
    .unwrap();

    let err = load(&path).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("equation 'bad'"), "{message}");
    assert!(message.contains("invalid expression"), "{message}");
    assert!(message.contains("h must be positive"), "{message}");
}

#[test]
fn newer_version_rejected() {
    let dir = unique_temp_dir("oc_project_version");
    let path = dir.join("library.yaml");
    fs::write(&path, "version: 99\nequations: []\n").unwrap();
    assert!(matches!(
        load(&path),
        Err(ProjectError::Validation(
            ValidationError::UnsupportedVersion { version: 99 }
        ))
    ));
}

#[test]
fn missing_file_defaults_and_unknown_extension_fails() {
    let dir = unique_temp_dir("oc_project_missing");
    let library = load_or_default(&dir.join("absent.yaml")).expect("default");
    assert!(library.equations.is_empty());

    assert!(matches!(
        load_or_default(&dir.join("library.toml")),
        Err(ProjectError::UnknownFormat { .. })
    ));
}
