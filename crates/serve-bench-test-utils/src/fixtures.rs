//! Temporary benchmark workspace
//!
//! Mirrors the on-disk layout the validator reads:
//!
//! ```text
//! <root>/
//!   suite.yaml
//!   models_config/<model>.yaml
//!   models_baseline/<model>.yaml
//!   results/<mode>_<model>_w<workers>_b<batch_size>/ab_report.csv
//! ```

use anyhow::Result;
use serve_bench_common::RunKey;
use serve_bench_common::defaults::BENCHMARK_REPORT_CSV;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A benchmark input tree rooted in a temporary directory
///
/// The directory is removed when the workspace is dropped.
pub struct BenchWorkspace {
    dir: TempDir,
}

impl BenchWorkspace {
    /// Create an empty workspace with the config, baseline and results directories
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("models_config"))?;
        std::fs::create_dir(dir.path().join("models_baseline"))?;
        std::fs::create_dir(dir.path().join("results"))?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn suite_path(&self) -> PathBuf {
        self.root().join("suite.yaml")
    }

    pub fn models_config_dir(&self) -> PathBuf {
        self.root().join("models_config")
    }

    pub fn baseline_dir(&self) -> PathBuf {
        self.root().join("models_baseline")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root().join("results")
    }

    /// Write a suite config listing the given model definition files
    pub fn write_suite(&self, model_files: &[&str]) -> Result<PathBuf> {
        let mut content = String::from("models:\n");
        for file in model_files {
            content.push_str(&format!("  - \"{file}\"\n"));
        }
        let path = self.suite_path();
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a model definition document
    pub fn write_definition(&self, file: &str, content: &str) -> Result<PathBuf> {
        let path = self.models_config_dir().join(file);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a baseline document
    pub fn write_baseline(&self, file: &str, content: &str) -> Result<PathBuf> {
        let path = self.baseline_dir().join(file);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a one-row report for a run, named after its key
    pub fn write_report(&self, key: &RunKey, metrics: &[(&str, f64)]) -> Result<PathBuf> {
        self.write_report_in(&key.dir_name(), metrics)
    }

    /// Write a one-row report into an arbitrarily named result directory
    pub fn write_report_in(&self, dir_name: &str, metrics: &[(&str, f64)]) -> Result<PathBuf> {
        let header = metrics
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(",");
        let row = metrics
            .iter()
            .map(|(_, value)| value.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.write_raw_report(dir_name, &format!("{header}\n{row}\n"))
    }

    /// Write report content verbatim into a result directory
    pub fn write_raw_report(&self, dir_name: &str, content: &str) -> Result<PathBuf> {
        let run_dir = self.results_dir().join(dir_name);
        std::fs::create_dir_all(&run_dir)?;
        let path = run_dir.join(BENCHMARK_REPORT_CSV);
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
