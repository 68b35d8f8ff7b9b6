//! Definition and validation errors
//!
//! Typed errors for every failure the expansion and validation passes can
//! report. The binary wraps them in `anyhow` only at the top level.

use serve_bench_common::{RunKey, ValidationStatus};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading and expanding a model definition document
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Failed to read the definition file
    #[error("Failed to read definition file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid YAML
    #[error("Failed to parse definition file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Document is valid YAML but not shaped like a definition
    #[error("Malformed definition file '{}': {message}", .path.display())]
    Malformed { path: PathBuf, message: String },

    /// A mode lacks `batch_size` or `workers`
    #[error(
        "Definition file '{}' is missing '{field}' for model '{model}', mode '{mode}'",
        .path.display()
    )]
    MissingField {
        path: PathBuf,
        model: String,
        mode: String,
        field: &'static str,
    },
}

impl DefinitionError {
    /// Create an IO error with path context
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a structural error with path context
    pub fn malformed(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }
}

/// Which side of a comparison lacked a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MetricSide {
    Baseline,
    Generated,
}

/// Errors raised by the validation pass
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The results directory does not exist
    #[error("No report generated: results directory '{}' does not exist", .path.display())]
    ResultsAbsent { path: PathBuf },

    /// The results directory exists but holds no run subdirectories.
    ///
    /// Reported on its own rather than as a missing baseline, since no
    /// report name exists to look up.
    #[error("No benchmark reports found in '{}'", .path.display())]
    NoReports { path: PathBuf },

    /// No baseline entry exists for a generated report or a run configuration
    #[error("No baseline found for '{report}'")]
    MissingBaseline { report: String },

    /// An observed metric deviates from its baseline beyond tolerance
    #[error(
        "Error while validating {metric} for model: {key}, \
         Expected value: {expected}, Observed value: {observed}"
    )]
    MetricOutOfTolerance {
        key: RunKey,
        metric: String,
        expected: f64,
        observed: f64,
        deviation: f64,
    },

    /// A validated metric is absent from the baseline or the generated report
    #[error("Metric '{metric}' missing from {side} report for model: {key}")]
    MissingMetric {
        key: RunKey,
        metric: String,
        side: MetricSide,
    },

    /// Model definition could not be expanded
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Suite configuration is unusable
    #[error("Invalid suite config '{}': {message}", .path.display())]
    Suite { path: PathBuf, message: String },

    /// Baseline document could not be parsed
    #[error("Failed to parse baseline file '{}': {source}", .path.display())]
    Baseline {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Generated report CSV could not be parsed
    #[error("Failed to parse report '{}': {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Generated report CSV has a header but no data row
    #[error("Report '{}' contains no data row", .path.display())]
    EmptyReport { path: PathBuf },

    /// Failed to read an input file or directory
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ValidationError {
    /// Create an IO error with path context
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Terminal status this error leaves the validation pass in
    pub fn status(&self) -> ValidationStatus {
        match self {
            ValidationError::ResultsAbsent { .. } => ValidationStatus::NoReport,
            _ => ValidationStatus::Failed,
        }
    }

    /// Whether this error only fails the report it was raised for
    pub fn is_report_failure(&self) -> bool {
        matches!(
            self,
            ValidationError::MetricOutOfTolerance { .. } | ValidationError::MissingMetric { .. }
        )
    }
}
