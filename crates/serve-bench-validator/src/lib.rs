//! serve-bench-validator - benchmark definition expansion and report validation
//!
//! This crate expands per-model benchmark definitions into concrete run
//! configurations and validates the reports produced by those runs against
//! recorded baselines.
//!
//! ## Modules
//!
//! - [`expand`]: Model definition parsing and cross-product expansion
//! - [`suite`]: Suite configuration listing the model definition files
//! - [`baseline`]: Baseline documents indexed by run key
//! - [`generated`]: Generated CSV reports read from result directories
//! - [`validate`]: The comparison pass and its verdicts
//! - [`summary`]: Verdict lines, summary table and JSON output

pub mod baseline;
pub mod config;
pub mod error;
pub mod expand;
pub mod generated;
pub mod suite;
pub mod summary;
pub mod validate;

pub use config::{OutputFlags, PathsConfig, ValidateConfig, ValidationPolicy};
pub use error::{DefinitionError, ValidationError};
pub use validate::{ValidationReport, validate_reports};
