//! serve-bench-validator: benchmark report validation against baselines
//!
//! Expands model benchmark definitions into run configurations and checks
//! the reports of a benchmark run against recorded baselines.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serve_bench_common::ValidationStatus;
use serve_bench_common::defaults::{
    BENCHMARK_REPORT_CSV, DEFAULT_BASELINE_DIR, DEFAULT_MODELS_CONFIG_DIR, DEFAULT_RESULTS_DIR,
    default_skip_list,
};
use serve_bench_common::metrics::default_validated_metrics;
use serve_bench_validator::config::{OutputFlags, PathsConfig, ValidateConfig, ValidationPolicy};
use serve_bench_validator::{ValidationError, expand, summary, validate_reports};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "serve-bench-validator")]
#[command(about = "Validate model server benchmark reports against baselines")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

/// Arguments for the validate command (extracted to reduce enum size)
#[derive(clap::Args, Debug)]
struct ValidateArgs {
    /// Directory holding one result subdirectory per benchmark run
    #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
    input: PathBuf,

    /// Benchmark suite config listing the model definition files
    #[arg(long)]
    input_cfg: PathBuf,

    /// Directory holding model definition files
    #[arg(long, env = "SERVE_BENCH_MODELS_CONFIG_DIR", default_value = DEFAULT_MODELS_CONFIG_DIR)]
    models_config_dir: PathBuf,

    /// Directory holding model baseline files
    #[arg(long, env = "SERVE_BENCH_BASELINE_DIR", default_value = DEFAULT_BASELINE_DIR)]
    baseline_dir: PathBuf,

    /// Report file name inside each result subdirectory
    #[arg(long, default_value = BENCHMARK_REPORT_CSV)]
    report_file: String,

    /// Metric to validate (repeatable, replaces the default list)
    #[arg(long = "metric")]
    metrics: Vec<String>,

    /// Model definition file to skip (repeatable, replaces the default list)
    #[arg(long = "skip")]
    skip: Vec<String>,

    /// Output JSON file for the verdict
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Don't print the summary table
    #[arg(long)]
    no_table: bool,
}

impl From<ValidateArgs> for ValidateConfig {
    fn from(args: ValidateArgs) -> Self {
        let metrics = if args.metrics.is_empty() {
            default_validated_metrics()
        } else {
            args.metrics
        };
        let skip_models = if args.skip.is_empty() {
            default_skip_list()
        } else {
            args.skip
        };

        Self {
            paths: PathsConfig {
                results_dir: args.input,
                suite_config: args.input_cfg,
                models_config_dir: args.models_config_dir,
                baseline_dir: args.baseline_dir,
                report_file: args.report_file,
            },
            policy: ValidationPolicy {
                metrics,
                skip_models,
            },
            flags: OutputFlags {
                output: args.output,
                no_table: args.no_table,
            },
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate generated benchmark reports against baselines
    Validate(Box<ValidateArgs>),

    /// Expand a model definition into its run configurations
    Expand {
        /// Model definition file
        #[arg(long)]
        definition: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

fn main() {
    match run() {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(e) => {
            print_error(&e);
            std::process::exit(ValidationStatus::Failed.exit_code());
        }
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }

    if std::env::var("RUST_BACKTRACE").is_err() {
        let _ = writeln!(
            stderr,
            "\n\x1b[2mSet RUST_BACKTRACE=1 for a detailed backtrace\x1b[0m"
        );
    } else {
        let backtrace = e.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            let _ = writeln!(stderr, "\n\x1b[2mBacktrace:\x1b[0m\n{backtrace}");
        }
    }
}

fn run() -> Result<ValidationStatus> {
    // Logs go to stderr; stdout carries verdicts
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Validate(validate_args) => {
            let config: ValidateConfig = (*validate_args).into();
            handle_validate(&config)
        }
        Command::Expand { definition, format } => {
            handle_expand(definition, format)?;
            Ok(ValidationStatus::Validated)
        }
    }
}

/// Handle the validate command
fn handle_validate(config: &ValidateConfig) -> Result<ValidationStatus> {
    info!(
        results = %config.paths.results_dir.display(),
        suite = %config.paths.suite_config.display(),
        metrics = config.policy.metrics.len(),
        skip = ?config.policy.skip_models,
        "Validating benchmark reports"
    );

    let report = match validate_reports(config) {
        Ok(report) => report,
        Err(e @ ValidationError::ResultsAbsent { .. }) => {
            println!("No report generated");
            return Ok(e.status());
        }
        Err(e) => return Err(e).context("Validation did not complete"),
    };

    summary::print_verdicts(&report);
    if !config.flags.no_table {
        summary::print_results_summary(&report);
    }
    if let Some(path) = &config.flags.output {
        summary::write_results(path, config, &report)?;
    }

    let status = report.status();
    if status.is_success() {
        info!(reports = report.verdicts.len(), "All reports validated");
    } else {
        warn!(failed = report.failures().count(), "Validation failed");
    }
    Ok(status)
}

/// Handle the expand command
fn handle_expand(definition: PathBuf, format: OutputFormat) -> Result<()> {
    let configs = expand::expand_file(&definition)
        .with_context(|| format!("Failed to expand {}", definition.display()))?;

    match format {
        OutputFormat::Json => summary::print_expanded_json(&configs)?,
        OutputFormat::Table => summary::print_expanded_table(&configs),
    }
    Ok(())
}
