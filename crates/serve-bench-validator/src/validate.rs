//! Baseline comparison pass
//!
//! Loads baselines for every suite entry, reads one generated report per
//! result subdirectory, and checks each validated metric by relative error.
//! The first failing metric of a report ends that report's checks; other
//! reports are still compared and the pass as a whole fails.

use crate::baseline::{BaselineReport, BaselineSet};
use crate::config::{PathsConfig, ValidateConfig};
use crate::error::{MetricSide, ValidationError};
use crate::generated::GeneratedReport;
use crate::suite::SuiteConfig;
use serve_bench_common::{RunKey, ValidationStatus, relative_error, within_tolerance};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Outcome of comparing one generated report with its baseline
#[derive(Debug)]
pub struct ReportVerdict {
    pub key: RunKey,
    /// Metrics compared, zero when the report failed
    pub metrics_checked: usize,
    /// First failure, if any
    pub failure: Option<ValidationError>,
}

impl ReportVerdict {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Result of a complete validation pass
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// One verdict per generated report, in result directory order
    pub verdicts: Vec<ReportVerdict>,
    /// Suite entries left out by the skip list
    pub skipped_models: Vec<String>,
    /// Result subdirectories belonging to skipped suite entries
    pub skipped_reports: Vec<String>,
}

impl ValidationReport {
    pub fn status(&self) -> ValidationStatus {
        if self.verdicts.iter().all(ReportVerdict::passed) {
            ValidationStatus::Validated
        } else {
            ValidationStatus::Failed
        }
    }

    /// Verdicts that failed
    pub fn failures(&self) -> impl Iterator<Item = &ReportVerdict> {
        self.verdicts.iter().filter(|v| !v.passed())
    }
}

/// Compare every validated metric of `report` against `baseline`.
///
/// Returns the number of metrics checked, or the first failure.
pub fn compare_report(
    report: &GeneratedReport,
    baseline: &BaselineReport,
    metrics: &[String],
) -> Result<usize, ValidationError> {
    let deviation = baseline.deviation();

    for metric in metrics {
        let missing = |side| ValidationError::MissingMetric {
            key: report.key.clone(),
            metric: metric.clone(),
            side,
        };
        let expected = baseline
            .expected(metric)
            .ok_or_else(|| missing(MetricSide::Baseline))?;
        let observed = report
            .observed(metric)
            .ok_or_else(|| missing(MetricSide::Generated))?;

        debug!(
            key = %report.key,
            metric = %metric,
            expected,
            observed,
            error = relative_error(expected, observed),
            deviation,
            "Comparing metric"
        );

        if !within_tolerance(expected, observed, deviation) {
            return Err(ValidationError::MetricOutOfTolerance {
                key: report.key.clone(),
                metric: metric.clone(),
                expected,
                observed,
                deviation,
            });
        }
    }

    Ok(metrics.len())
}

/// Generated reports found in a results directory, plus the subdirectories
/// that belong to skipped suite entries
#[derive(Debug, Default)]
pub struct GeneratedReports {
    pub reports: Vec<GeneratedReport>,
    pub skipped: Vec<String>,
}

/// Read one report per result subdirectory, in sorted name order.
///
/// A subdirectory that matches no baseline is a hard error unless it belongs
/// to a skipped suite entry.
pub fn collect_generated(
    results_dir: &Path,
    baselines: &BaselineSet,
    paths: &PathsConfig,
) -> Result<GeneratedReports, ValidationError> {
    let entries =
        std::fs::read_dir(results_dir).map_err(|e| ValidationError::io(results_dir, e))?;

    let mut run_dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ValidationError::io(results_dir, e))?;
        if !entry.path().is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => run_dirs.push((name, entry.path())),
            Err(name) => warn!(name = ?name, "Ignoring result directory with non UTF-8 name"),
        }
    }
    run_dirs.sort();

    if run_dirs.is_empty() {
        return Err(ValidationError::NoReports {
            path: results_dir.to_path_buf(),
        });
    }

    let mut generated = GeneratedReports::default();
    for (name, run_dir) in run_dirs {
        if let Some(key) = baselines.resolve(&name) {
            generated
                .reports
                .push(GeneratedReport::load(&run_dir, key, paths)?);
            continue;
        }

        match baselines.skipped_owner(&name) {
            Some(entry) => {
                info!(report = %name, model = %entry, "Skipping report of skipped model");
                generated.skipped.push(name);
            }
            None => return Err(ValidationError::MissingBaseline { report: name }),
        }
    }

    Ok(generated)
}

/// Run a complete validation pass.
///
/// Errors for which [`ValidationError::is_report_failure`] holds are recorded
/// in the affected report's verdict. Anything else, such as absent results,
/// unreadable inputs or reports without a baseline, ends the pass.
#[instrument(skip_all, fields(results = %config.paths.results_dir.display()))]
pub fn validate_reports(config: &ValidateConfig) -> Result<ValidationReport, ValidationError> {
    let paths = &config.paths;
    let policy = &config.policy;

    if !paths.results_dir.is_dir() {
        return Err(ValidationError::ResultsAbsent {
            path: paths.results_dir.clone(),
        });
    }

    let suite = SuiteConfig::load(&paths.suite_config)?;
    let baselines = BaselineSet::build(&suite, paths, policy)?;
    let generated = collect_generated(&paths.results_dir, &baselines, paths)?;

    if baselines.is_empty() {
        warn!("No baselines indexed, every suite entry is skipped");
    }

    let mut verdicts = Vec::with_capacity(generated.reports.len());
    for report in &generated.reports {
        // Keys were resolved against this set, so the lookup cannot miss.
        let outcome = match baselines.get(&report.key) {
            Some(baseline) => compare_report(report, baseline, &policy.metrics),
            None => Err(ValidationError::MissingBaseline {
                report: report.key.to_string(),
            }),
        };
        let verdict = match outcome {
            Ok(checked) => ReportVerdict {
                key: report.key.clone(),
                metrics_checked: checked,
                failure: None,
            },
            Err(e) if e.is_report_failure() => {
                warn!(key = %report.key, error = %e, "Report failed validation");
                ReportVerdict {
                    key: report.key.clone(),
                    metrics_checked: 0,
                    failure: Some(e),
                }
            }
            Err(e) => return Err(e),
        };
        verdicts.push(verdict);
    }

    let report = ValidationReport {
        verdicts,
        skipped_models: baselines.skipped().to_vec(),
        skipped_reports: generated.skipped,
    };

    info!(
        reports = report.verdicts.len(),
        failed = report.failures().count(),
        status = %report.status(),
        "Validation finished"
    );
    Ok(report)
}
