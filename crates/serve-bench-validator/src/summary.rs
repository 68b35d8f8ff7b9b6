//! Verdict output
//!
//! Prints per-report verdict lines and a summary table to stdout, writes the
//! verdict as JSON, and renders expanded run configurations.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use serve_bench_common::BenchmarkRunConfig;
use tracing::info;

use crate::config::ValidateConfig;
use crate::validate::ValidationReport;

/// Print one line per skipped model and one verdict line per report
pub fn print_verdicts(report: &ValidationReport) {
    for model in &report.skipped_models {
        println!("Skipping validation of {model}");
    }
    for dir in &report.skipped_reports {
        println!("Skipping report {dir}");
    }
    for verdict in &report.verdicts {
        match &verdict.failure {
            None => println!("Model {} successfully validated", verdict.key),
            Some(e) => println!("{e}"),
        }
    }
}

/// Print a summary table of report verdicts to stdout
pub fn print_results_summary(report: &ValidationReport) {
    if report.verdicts.is_empty() {
        return;
    }

    println!("\n=== Validation Results ===\n");
    let table = verdict_table(report);
    println!("{table}");
    println!(
        "\n{} of {} reports validated ({})",
        report.verdicts.len() - report.failures().count(),
        report.verdicts.len(),
        report.status()
    );
}

/// Summary table with one row per report, sorted by run key
fn verdict_table(report: &ValidationReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Run"),
            Cell::new("Mode"),
            Cell::new("Workers"),
            Cell::new("Batch"),
            Cell::new("Status"),
            Cell::new("Detail"),
        ]);

    let mut sorted: Vec<_> = report.verdicts.iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));

    for verdict in sorted {
        let (status, detail) = match &verdict.failure {
            None => ("Passed", format!("{} metrics", verdict.metrics_checked)),
            Some(e) => ("Failed", e.to_string()),
        };
        table.add_row(vec![
            Cell::new(&verdict.key),
            Cell::new(&verdict.key.mode),
            Cell::new(verdict.key.workers),
            Cell::new(verdict.key.batch_size),
            Cell::new(status),
            Cell::new(detail),
        ]);
    }

    table
}

/// Verdict as a JSON document
pub fn results_json(config: &ValidateConfig, report: &ValidationReport) -> serde_json::Value {
    let written_at = chrono::Utc::now();

    let reports: BTreeMap<String, serde_json::Value> = report
        .verdicts
        .iter()
        .map(|v| {
            (
                v.key.to_string(),
                serde_json::json!({
                    "mode": v.key.mode,
                    "model": v.key.model,
                    "workers": v.key.workers,
                    "batch_size": v.key.batch_size,
                    "passed": v.passed(),
                    "metrics_checked": v.metrics_checked,
                    "error": v.failure.as_ref().map(|e| e.to_string()),
                }),
            )
        })
        .collect();

    serde_json::json!({
        "written_at": written_at.to_rfc3339(),
        "status": report.status().as_ref(),
        "results_dir": config.paths.results_dir.display().to_string(),
        "suite_config": config.paths.suite_config.display().to_string(),
        "validated_metrics": config.policy.metrics,
        "skipped": report.skipped_models,
        "skipped_reports": report.skipped_reports,
        "reports": reports,
    })
}

/// Write the verdict JSON to `path`
pub fn write_results(path: &Path, config: &ValidateConfig, report: &ValidationReport) -> Result<()> {
    let output = results_json(config, report);
    std::fs::write(path, serde_json::to_string_pretty(&output)?)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;
    info!(path = %path.display(), "Results written");
    Ok(())
}

/// Print expanded run configurations as a table
pub fn print_expanded_table(configs: &[BenchmarkRunConfig]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Model"),
            Cell::new("Mode"),
            Cell::new("Batch"),
            Cell::new("Workers"),
            Cell::new("Settings"),
        ]);

    for config in configs {
        let settings = config
            .settings
            .iter()
            .map(|(k, v)| format!("{k}={}", render_value(v)))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&config.model),
            Cell::new(&config.mode),
            Cell::new(config.batch_size),
            Cell::new(config.workers),
            Cell::new(settings),
        ]);
    }

    println!("{table}");
    println!("\nTotal: {} run configurations", configs.len());
}

/// Print expanded run configurations as pretty JSON
pub fn print_expanded_json(configs: &[BenchmarkRunConfig]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(configs)?);
    Ok(())
}

fn render_value(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PathsConfig, ValidationPolicy};
    use crate::error::ValidationError;
    use crate::validate::ReportVerdict;
    use serve_bench_common::RunKey;

    fn sample_report() -> ValidationReport {
        ValidationReport {
            verdicts: vec![
                ReportVerdict {
                    key: RunKey::new("eager_mode", "bert", 4, 1),
                    metrics_checked: 11,
                    failure: None,
                },
                ReportVerdict {
                    key: RunKey::new("eager_mode", "bert", 4, 2),
                    metrics_checked: 0,
                    failure: Some(ValidationError::MetricOutOfTolerance {
                        key: RunKey::new("eager_mode", "bert", 4, 2),
                        metric: "TS throughput".to_string(),
                        expected: 100.0,
                        observed: 150.0,
                        deviation: 0.1,
                    }),
                },
            ],
            skipped_models: vec!["bert_multi_gpu.yaml".to_string()],
            skipped_reports: vec![],
        }
    }

    #[test]
    fn test_results_json() {
        let config = ValidateConfig::new(
            PathsConfig::with_suite_config("suite.yaml"),
            ValidationPolicy::default(),
        );
        let json = results_json(&config, &sample_report());

        assert_eq!(json["status"], "failed");
        assert_eq!(json["suite_config"], "suite.yaml");
        assert_eq!(json["skipped"][0], "bert_multi_gpu.yaml");
        assert_eq!(json["validated_metrics"].as_array().unwrap().len(), 11);

        let passed = &json["reports"]["eager_mode_bert_w4_b1"];
        assert_eq!(passed["passed"], true);
        assert_eq!(passed["metrics_checked"], 11);
        assert!(passed["error"].is_null());

        let failed = &json["reports"]["eager_mode_bert_w4_b2"];
        assert_eq!(failed["passed"], false);
        assert!(
            failed["error"]
                .as_str()
                .unwrap()
                .contains("Observed value: 150")
        );
    }

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verdict.json");
        let config = ValidateConfig::new(
            PathsConfig::with_suite_config("suite.yaml"),
            ValidationPolicy::default(),
        );
        write_results(&path, &config, &sample_report()).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(parsed["written_at"].is_string());
        assert_eq!(parsed["reports"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_verdict_table_names_each_run() {
        let rendered = verdict_table(&sample_report()).to_string();
        assert!(rendered.contains("eager_mode_bert_w4_b1"));
        assert!(rendered.contains("eager_mode_bert_w4_b2"));
        assert!(rendered.contains("Passed"));
        assert!(rendered.contains("Failed"));
    }

    #[test]
    fn test_render_value() {
        assert_eq!(
            render_value(&serde_yaml::Value::String("ab".to_string())),
            "ab"
        );
        assert_eq!(render_value(&serde_yaml::Value::from(100)), "100");
        assert_eq!(render_value(&serde_yaml::Value::Bool(true)), "true");
    }
}
