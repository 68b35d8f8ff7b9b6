//! Sample definition and baseline documents
//!
//! Shaped like the documents the benchmark harness ships for its models.

/// Definition with two modes: eager expands to 4 runs, scripted to 2
pub const BERT_DEFINITION: &str = r#"
bert:
  eager_mode:
    benchmark_engine: "ab"
    url: https://example.com/models/bert.mar
    workers:
      - 4
      - 8
    batch_delay: 100
    batch_size:
      - 1
      - 2
    requests: 10000
    concurrency: 100
    input: ./examples/text_classification/sample_text.txt
  scripted_mode:
    benchmark_engine: "ab"
    url: https://example.com/models/bert_scripted.mar
    workers:
      - 4
    batch_delay: 100
    batch_size:
      - 1
      - 2
    requests: 10000
    concurrency: 100
"#;

/// Baseline matching [`BERT_DEFINITION`] with a 10% deviation
pub const BERT_BASELINE: &str = r#"
bert:
  eager_mode:
    TS throughput: 100
    TS latency P50: 40
    Model_p50: 20
    deviation: 0.1
  scripted_mode:
    TS throughput: 150
    TS latency P50: 30
    Model_p50: 15
    deviation: 0.1
"#;

/// Metrics checked by tests using the sample baseline
pub const SAMPLE_METRICS: &[&str] = &["TS throughput", "TS latency P50", "Model_p50"];

/// Observed metrics exactly matching the eager baseline
pub const EAGER_EXPECTED: &[(&str, f64)] = &[
    ("TS throughput", 100.0),
    ("TS latency P50", 40.0),
    ("Model_p50", 20.0),
];

/// Observed metrics exactly matching the scripted baseline
pub const SCRIPTED_EXPECTED: &[(&str, f64)] = &[
    ("TS throughput", 150.0),
    ("TS latency P50", 30.0),
    ("Model_p50", 15.0),
];
