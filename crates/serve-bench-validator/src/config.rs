//! Configuration types for a validation pass

use serve_bench_common::defaults::{
    BENCHMARK_REPORT_CSV, DEFAULT_BASELINE_DIR, DEFAULT_MODELS_CONFIG_DIR, DEFAULT_RESULTS_DIR,
    default_skip_list,
};
use serve_bench_common::metrics::default_validated_metrics;
use std::path::{Path, PathBuf};

/// Input locations
#[derive(Debug, Clone)]
pub struct PathsConfig {
    /// Directory with one subdirectory per benchmark run
    pub results_dir: PathBuf,
    /// Suite configuration listing the model definition files
    pub suite_config: PathBuf,
    /// Directory holding model definition files
    pub models_config_dir: PathBuf,
    /// Directory holding baseline files, named like the definitions
    pub baseline_dir: PathBuf,
    /// Report file name inside each result subdirectory
    pub report_file: String,
}

impl PathsConfig {
    /// Paths rooted at the default locations, with the given suite config
    pub fn with_suite_config(suite_config: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            suite_config: suite_config.into(),
            models_config_dir: PathBuf::from(DEFAULT_MODELS_CONFIG_DIR),
            baseline_dir: PathBuf::from(DEFAULT_BASELINE_DIR),
            report_file: BENCHMARK_REPORT_CSV.to_string(),
        }
    }

    /// Definition file for a suite entry
    pub fn definition_path(&self, model_file: &str) -> PathBuf {
        self.models_config_dir.join(model_file)
    }

    /// Baseline file for a suite entry
    pub fn baseline_path(&self, model_file: &str) -> PathBuf {
        self.baseline_dir.join(model_file)
    }

    /// Report artifact inside a result subdirectory
    pub fn report_path(&self, run_dir: &Path) -> PathBuf {
        run_dir.join(&self.report_file)
    }
}

/// Which metrics are checked and which models are left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Metric names compared for every generated report, in order
    pub metrics: Vec<String>,
    /// Model definition file names excluded from validation
    pub skip_models: Vec<String>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            metrics: default_validated_metrics(),
            skip_models: default_skip_list(),
        }
    }
}

impl ValidationPolicy {
    /// Whether a suite entry is excluded from validation
    pub fn is_skipped(&self, model_file: &str) -> bool {
        self.skip_models.iter().any(|s| s == model_file)
    }
}

/// Output behavior flags
#[derive(Debug, Clone, Default)]
pub struct OutputFlags {
    /// Write the verdict as JSON to this path
    pub output: Option<PathBuf>,
    /// Suppress the summary table
    pub no_table: bool,
}

/// Configuration for a validation pass
///
/// Composed of focused sub-configs; the CLI builds one from its arguments and
/// tests build them directly.
#[derive(Debug, Clone)]
pub struct ValidateConfig {
    pub paths: PathsConfig,
    pub policy: ValidationPolicy,
    pub flags: OutputFlags,
}

impl ValidateConfig {
    pub fn new(paths: PathsConfig, policy: ValidationPolicy) -> Self {
        Self {
            paths,
            policy,
            flags: OutputFlags::default(),
        }
    }
}
