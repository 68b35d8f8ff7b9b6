//! Benchmark suite configuration
//!
//! The suite file lists which model definition files take part in a run.
//! Other keys written by the benchmark harness are tolerated and ignored.

use crate::error::ValidationError;
use garde::Validate;
use serde::Deserialize;
use std::path::Path;

/// Suite configuration loaded from YAML
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SuiteConfig {
    /// Model definition file names, e.g. `bert.yaml`
    #[garde(length(min = 1), inner(length(min = 1)))]
    pub models: Vec<String>,
}

impl SuiteConfig {
    /// Load and validate a suite configuration file
    pub fn load(path: &Path) -> Result<Self, ValidationError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ValidationError::io(path, e))?;
        Self::from_yaml_str(&content, path)
    }

    /// Parse and validate a suite configuration; `path` is only used for error context
    pub fn from_yaml_str(content: &str, path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let suite_error = |message: String| ValidationError::Suite {
            path: path.to_path_buf(),
            message,
        };

        let config: SuiteConfig =
            serde_yaml::from_str(content).map_err(|e| suite_error(e.to_string()))?;
        config.validate().map_err(|e| suite_error(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_suite() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "models:\n  - bert.yaml\n  - vgg11.yaml\nhardware: cpu\nmetrics_cmd: []\n"
        )
        .unwrap();

        let suite = SuiteConfig::load(file.path()).unwrap();
        assert_eq!(suite.models, vec!["bert.yaml", "vgg11.yaml"]);
    }

    #[test]
    fn test_empty_models_rejected() {
        let err = SuiteConfig::from_yaml_str("models: []\n", "suite.yaml").unwrap_err();
        assert!(matches!(err, ValidationError::Suite { .. }));
    }

    #[test]
    fn test_blank_model_name_rejected() {
        let err = SuiteConfig::from_yaml_str("models: [\"\"]\n", "suite.yaml").unwrap_err();
        assert!(matches!(err, ValidationError::Suite { .. }));
    }

    #[test]
    fn test_missing_models_key_rejected() {
        let err = SuiteConfig::from_yaml_str("hardware: gpu\n", "suite.yaml").unwrap_err();
        assert!(err.to_string().contains("suite.yaml"));
    }
}
