//! oc-project: equation library file format and validation.

pub mod library;
pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{
    MAX_EXPRESSION_LEN, MAX_NAME_LEN, ValidationError, ValidationErrors, validate,
    validate_and_compile, validate_library,
};

use std::path::Path;

pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Equation not found: {name}")]
    NotFound { name: String },

    #[error("Unsupported library file extension: {path}")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> ProjectResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(ProjectError::UnknownFormat {
            path: path.display().to_string(),
        }),
    }
}

pub fn load_yaml(path: &Path) -> ProjectResult<Library> {
    let content = std::fs::read_to_string(path)?;
    let library: Library = serde_yaml::from_str(&content)?;
    validate_library(&library)?;
    Ok(library)
}

pub fn save_yaml(path: &Path, library: &Library) -> ProjectResult<()> {
    validate_library(library)?;
    let content = serde_yaml::to_string(library)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Library> {
    let content = std::fs::read_to_string(path)?;
    let library: Library = serde_json::from_str(&content)?;
    validate_library(&library)?;
    Ok(library)
}

pub fn save_json(path: &Path, library: &Library) -> ProjectResult<()> {
    validate_library(library)?;
    let content = serde_json::to_string_pretty(library)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by file extension (`.yaml`, `.yml` or `.json`).
pub fn load(path: &Path) -> ProjectResult<Library> {
    match format_of(path)? {
        Format::Yaml => load_yaml(path),
        Format::Json => load_json(path),
    }
}

/// Parse by file extension without validating, for reporting every
/// problem in a library rather than stopping at the first.
pub fn load_unchecked(path: &Path) -> ProjectResult<Library> {
    let content = std::fs::read_to_string(path)?;
    let library: Library = match format_of(path)? {
        Format::Yaml => serde_yaml::from_str(&content)?,
        Format::Json => serde_json::from_str(&content)?,
    };
    Ok(library)
}

/// Save by file extension (`.yaml`, `.yml` or `.json`).
pub fn save(path: &Path, library: &Library) -> ProjectResult<()> {
    match format_of(path)? {
        Format::Yaml => save_yaml(path, library),
        Format::Json => save_json(path, library),
    }
}

/// Like [`load`], but a missing file yields an empty library.
pub fn load_or_default(path: &Path) -> ProjectResult<Library> {
    format_of(path)?;
    if path.exists() {
        load(path)
    } else {
        Ok(Library::default())
    }
}
