//! Concrete benchmark run configuration
//!
//! Produced by expanding a model definition: one value per
//! (mode, batch_size, workers) combination, carrying every other scalar
//! setting of the mode unchanged.

use crate::RunKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// One concrete benchmark run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRunConfig {
    /// Model name
    pub model: String,
    /// Execution mode
    pub mode: String,
    /// Inference batch size for this run
    pub batch_size: u32,
    /// Number of model workers for this run
    pub workers: u32,
    /// Remaining settings of the mode, copied verbatim
    #[serde(flatten)]
    pub settings: BTreeMap<String, serde_yaml::Value>,
}

impl BenchmarkRunConfig {
    /// Structured key identifying this run
    pub fn key(&self) -> RunKey {
        RunKey::new(&self.mode, &self.model, self.workers, self.batch_size)
    }

    /// Look up a carried-over setting
    pub fn setting(&self, name: &str) -> Option<&serde_yaml::Value> {
        self.settings.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BenchmarkRunConfig {
        let mut settings = BTreeMap::new();
        settings.insert(
            "url".to_string(),
            serde_yaml::Value::String("https://example.com/bert.mar".to_string()),
        );
        settings.insert("requests".to_string(), serde_yaml::Value::from(10000));
        BenchmarkRunConfig {
            model: "bert".to_string(),
            mode: "eager_mode".to_string(),
            batch_size: 8,
            workers: 4,
            settings,
        }
    }

    #[test]
    fn test_key() {
        assert_eq!(sample().key(), RunKey::new("eager_mode", "bert", 4, 8));
    }

    #[test]
    fn test_setting_lookup() {
        let config = sample();
        assert_eq!(
            config.setting("requests"),
            Some(&serde_yaml::Value::from(10000))
        );
        assert!(config.setting("concurrency").is_none());
    }

    #[test]
    fn test_serialization_flattens_settings() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["model"], "bert");
        assert_eq!(json["batch_size"], 8);
        assert_eq!(json["requests"], 10000);
        assert_eq!(json["url"], "https://example.com/bert.mar");
    }
}
