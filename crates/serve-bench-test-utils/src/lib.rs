//! Shared test utilities for serve-bench
//!
//! This crate provides fixture builders that lay out benchmark inputs on disk
//! the way a benchmark run leaves them, so tests can drive the validator
//! end to end without a real benchmark harness.
//!
//! ## Modules
//!
//! - [`fixtures`]: Temporary workspace with definitions, baselines and results
//! - [`samples`]: Sample definition and baseline documents

pub mod fixtures;
pub mod samples;

// Re-export commonly used items
pub use fixtures::BenchWorkspace;
