//! Run storage API.

use crate::types::{RunManifest, SampleRecord};
use crate::{ResultsError, ResultsResult};
use oc_sim::Trajectory;
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const SAMPLES_FILE: &str = "samples.jsonl";

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store rooted at `<library dir>/.odecalc/runs`.
    pub fn for_library(library_path: &Path) -> ResultsResult<Self> {
        let library_dir = library_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "library path has no parent directory".to_string(),
            })?;
        let runs_dir = library_dir.join(".odecalc").join("runs");
        Self::new(runs_dir)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        let dir = self.run_dir(run_id);
        dir.join(MANIFEST_FILE).exists() && dir.join(SAMPLES_FILE).exists()
    }

    pub fn save_run(&self, manifest: &RunManifest, records: &[SampleRecord]) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        // Samples first: a manifest is only present once its samples are.
        let mut samples_content = String::new();
        for record in records {
            let line = serde_json::to_string(record)?;
            samples_content.push_str(&line);
            samples_content.push('\n');
        }
        fs::write(run_dir.join(SAMPLES_FILE), samples_content)?;

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(run_dir.join(MANIFEST_FILE), manifest_json)?;

        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join(MANIFEST_FILE);

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn load_samples(&self, run_id: &str) -> ResultsResult<Vec<SampleRecord>> {
        let samples_path = self.run_dir(run_id).join(SAMPLES_FILE);

        if !samples_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(samples_path)?;
        let mut records = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                let record: SampleRecord = serde_json::from_str(line)?;
                records.push(record);
            }
        }

        Ok(records)
    }

    /// Stored run as `(euler, euler_cauchy)`.
    pub fn load_trajectories(&self, run_id: &str) -> ResultsResult<(Trajectory, Trajectory)> {
        let records = self.load_samples(run_id)?;
        Ok(crate::types::trajectories_from(&records))
    }

    /// Manifests of all runs stored for an equation name, unordered.
    pub fn list_runs(&self, equation_name: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id)
                    && manifest.equation.name == equation_name
                {
                    runs.push(manifest);
                }
            }
        }

        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
