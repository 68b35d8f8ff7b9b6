//! Default configuration values shared between the validator and its tests
//!
//! These constants keep the CLI defaults and the test fixtures in agreement
//! about where benchmark inputs live.

/// Default directory holding one result subdirectory per benchmark run
pub const DEFAULT_RESULTS_DIR: &str = "/tmp/ts_benchmark";

/// Default directory holding model benchmark definitions
pub const DEFAULT_MODELS_CONFIG_DIR: &str = "benchmarks/models_config";

/// Default directory holding model baseline documents
pub const DEFAULT_BASELINE_DIR: &str = "benchmarks/models_baseline";

/// Report artifact written into each result subdirectory
pub const BENCHMARK_REPORT_CSV: &str = "ab_report.csv";

/// Model definition files excluded from validation until baselines exist for them
pub const DEFAULT_SKIP_LIST: &[&str] = &[
    "bert_multi_gpu_better_transformer.yaml",
    "bert_multi_gpu_no_better_transformer.yaml",
];

/// Returns the default skip list as owned strings
pub fn default_skip_list() -> Vec<String> {
    DEFAULT_SKIP_LIST.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_skip_list_matches_constant() {
        let skip = default_skip_list();
        assert_eq!(skip.len(), DEFAULT_SKIP_LIST.len());
        assert!(skip.iter().all(|s| s.ends_with(".yaml")));
    }
}
