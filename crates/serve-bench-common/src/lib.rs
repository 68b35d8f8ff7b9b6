//! serve-bench-common - Shared types and utilities
//!
//! This crate provides the types shared by the validator and its test
//! fixtures, without any file-format or CLI dependencies beyond YAML values.
//!
//! ## Modules
//!
//! - [`defaults`]: Default paths, report file name and skip list
//! - [`metrics`]: Names of the metrics validated against baselines
//! - [`run_config`]: One concrete benchmark run produced by expansion
//! - [`run_key`]: Structured key joining runs, baselines and result directories
//! - [`status`]: Terminal status of a validation pass and its exit code
//! - [`tolerance`]: Relative-error checks against a deviation fraction

pub mod defaults;
pub mod metrics;
pub mod run_config;
pub mod run_key;
pub mod status;
pub mod tolerance;

// Re-export commonly used types
pub use run_config::BenchmarkRunConfig;
pub use run_key::RunKey;
pub use status::ValidationStatus;
pub use tolerance::{relative_error, within_tolerance};
