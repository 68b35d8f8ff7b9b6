//! Validated metric names.
//!
//! These are the column names written by the benchmark report generator into
//! `ab_report.csv` and the keys used in baseline documents. Both sides must
//! agree on spelling, including the embedded spaces.

/// Metric names
pub mod names {
    pub const TS_THROUGHPUT: &str = "TS throughput";
    pub const TS_LATENCY_P50: &str = "TS latency P50";
    pub const TS_LATENCY_P90: &str = "TS latency P90";
    pub const TS_LATENCY_P99: &str = "TS latency P99";
    pub const MODEL_P50: &str = "Model_p50";
    pub const MODEL_P90: &str = "Model_p90";
    pub const MODEL_P99: &str = "Model_p99";
    pub const MEMORY_PERCENTAGE_MEAN: &str = "memory_percentage_mean";
    pub const GPU_MEMORY_USED_MEAN: &str = "gpu_memory_used_mean";
    pub const CPU_PERCENTAGE_MEAN: &str = "cpu_percentage_mean";
    pub const GPU_PERCENTAGE_MEAN: &str = "gpu_percentage_mean";
}

/// Key holding the allowed fractional deviation in a baseline mode entry
pub const DEVIATION_KEY: &str = "deviation";

/// Metrics checked for every generated report unless overridden
pub const DEFAULT_VALIDATED_METRICS: &[&str] = &[
    names::TS_THROUGHPUT,
    names::TS_LATENCY_P50,
    names::TS_LATENCY_P90,
    names::TS_LATENCY_P99,
    names::MODEL_P50,
    names::MODEL_P90,
    names::MODEL_P99,
    names::MEMORY_PERCENTAGE_MEAN,
    names::GPU_MEMORY_USED_MEAN,
    names::CPU_PERCENTAGE_MEAN,
    names::GPU_PERCENTAGE_MEAN,
];

/// Returns the default validated metric list as owned strings
pub fn default_validated_metrics() -> Vec<String> {
    DEFAULT_VALIDATED_METRICS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
