//! Generated report loading
//!
//! Every run of the benchmark harness leaves a result subdirectory holding a
//! one-row CSV report. Numeric columns become metrics; text columns such as
//! the benchmark name are ignored.

use crate::config::PathsConfig;
use crate::error::ValidationError;
use serve_bench_common::RunKey;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Observed metrics of one benchmark run
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReport {
    pub key: RunKey,
    /// CSV file the metrics were read from
    pub source: PathBuf,
    pub metrics: BTreeMap<String, f64>,
}

impl GeneratedReport {
    /// Observed value of a metric, if the report has it
    pub fn observed(&self, metric: &str) -> Option<f64> {
        self.metrics.get(metric).copied()
    }

    /// Read the report of a result subdirectory
    pub fn load(run_dir: &Path, key: RunKey, paths: &PathsConfig) -> Result<Self, ValidationError> {
        let source = paths.report_path(run_dir);
        let metrics = read_report_csv(&source)?;
        debug!(key = %key, metrics = metrics.len(), "Loaded generated report");
        Ok(Self {
            key,
            source,
            metrics,
        })
    }
}

/// Read the first data row of a report CSV into a metric map
pub fn read_report_csv(path: &Path) -> Result<BTreeMap<String, f64>, ValidationError> {
    let report_error = |source: csv::Error| ValidationError::Report {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(report_error)?;

    let headers = reader.headers().map_err(report_error)?.clone();

    let record = match reader.records().next() {
        Some(record) => record.map_err(report_error)?,
        None => {
            return Err(ValidationError::EmptyReport {
                path: path.to_path_buf(),
            });
        }
    };

    Ok(headers
        .iter()
        .zip(record.iter())
        .filter_map(|(name, value)| {
            value
                .parse::<f64>()
                .ok()
                .map(|value| (name.to_string(), value))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_read_numeric_columns() {
        let file = csv_file(
            "Benchmark,Batch size,TS throughput,TS latency P50,Model_p50\n\
             AB,8,120.5,81.2,12\n",
        );
        let metrics = read_report_csv(file.path()).unwrap();
        assert_eq!(metrics["TS throughput"], 120.5);
        assert_eq!(metrics["TS latency P50"], 81.2);
        assert_eq!(metrics["Model_p50"], 12.0);
        assert_eq!(metrics["Batch size"], 8.0);
        assert!(!metrics.contains_key("Benchmark"));
    }

    #[test]
    fn test_only_first_row_is_read() {
        let file = csv_file("TS throughput\n10\n20\n");
        let metrics = read_report_csv(file.path()).unwrap();
        assert_eq!(metrics["TS throughput"], 10.0);
    }

    #[test]
    fn test_header_only_is_empty_report() {
        let file = csv_file("TS throughput,Model_p50\n");
        let err = read_report_csv(file.path()).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyReport { .. }));
    }

    #[test]
    fn test_missing_file_is_report_error() {
        let err = read_report_csv(Path::new("/nonexistent/ab_report.csv")).unwrap_err();
        assert!(matches!(err, ValidationError::Report { .. }));
    }

    #[test]
    fn test_load_from_run_dir() {
        let dir = tempfile::tempdir().unwrap();
        let run_dir = dir.path().join("eager_mode_bert_w4_b8");
        std::fs::create_dir(&run_dir).unwrap();
        std::fs::write(run_dir.join("ab_report.csv"), "TS throughput\n99.5\n").unwrap();

        let paths = PathsConfig::with_suite_config("suite.yaml");
        let key = RunKey::new("eager_mode", "bert", 4, 8);
        let report = GeneratedReport::load(&run_dir, key.clone(), &paths).unwrap();
        assert_eq!(report.key, key);
        assert_eq!(report.observed("TS throughput"), Some(99.5));
        assert_eq!(report.observed("Model_p50"), None);
    }
}
