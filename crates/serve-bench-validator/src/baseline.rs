//! Baseline indexing
//!
//! Each suite entry has a baseline document next to its definition:
//! `{model: {mode: {<metric>: value, ..., deviation: fraction}}}`. Expanding
//! the definition yields one run per (mode, batch_size, workers); every run is
//! indexed under its [`RunKey`] with the expectations of its mode.

use crate::config::{PathsConfig, ValidationPolicy};
use crate::error::ValidationError;
use crate::expand::{DefinitionDocument, expand_file};
use crate::suite::SuiteConfig;
use serde::Deserialize;
use serve_bench_common::run_key::split_dir_name;
use serve_bench_common::{BenchmarkRunConfig, RunKey};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Expected metric values for one model in one mode
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModeBaseline {
    /// Allowed fractional deviation for every metric of this mode
    pub deviation: f64,
    /// Expected value per metric name
    #[serde(flatten)]
    pub metrics: BTreeMap<String, f64>,
}

/// Parsed baseline document, keyed by model then mode
pub type BaselineDocument = BTreeMap<String, BTreeMap<String, ModeBaseline>>;

/// Baseline expectations for one run
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineReport {
    pub key: RunKey,
    /// Baseline file the expectations were read from
    pub source: PathBuf,
    pub expectations: ModeBaseline,
}

impl BaselineReport {
    /// Expected value of a metric, if the baseline records it
    pub fn expected(&self, metric: &str) -> Option<f64> {
        self.expectations.metrics.get(metric).copied()
    }

    pub fn deviation(&self) -> f64 {
        self.expectations.deviation
    }
}

/// Every baseline of a validation pass, indexed by run key
#[derive(Debug, Default)]
pub struct BaselineSet {
    reports: HashMap<RunKey, BaselineReport>,
    modes: BTreeSet<String>,
    skipped: Vec<String>,
    /// Skip entry owning each (mode, model) of a readable skipped definition
    skipped_runs: HashMap<(String, String), String>,
    skipped_modes: BTreeSet<String>,
    /// Skip entries whose definition could not be read
    unread_skips: Vec<String>,
}

impl BaselineSet {
    /// Build the index for every suite entry not on the skip list.
    ///
    /// Baselines of skipped entries are never read. Their definitions are
    /// read when present, only to recognise their result directories, so a
    /// missing definition or baseline for them is not an error.
    pub fn build(
        suite: &SuiteConfig,
        paths: &PathsConfig,
        policy: &ValidationPolicy,
    ) -> Result<Self, ValidationError> {
        let mut set = Self::default();

        for model_file in &suite.models {
            if policy.is_skipped(model_file) {
                warn!(model = %model_file, "Skipping validation of model without baseline");
                set.insert_skipped(model_file, &paths.definition_path(model_file));
                continue;
            }

            let configs = expand_file(&paths.definition_path(model_file))?;
            let baseline_path = paths.baseline_path(model_file);
            let document = load_baseline_document(&baseline_path)?;
            set.insert_model(&configs, &document, &baseline_path)?;
        }

        info!(
            baselines = set.len(),
            modes = set.modes.len(),
            skipped = set.skipped.len(),
            "Baselines loaded"
        );
        Ok(set)
    }

    /// Index the runs of one model against its baseline document
    pub fn insert_model(
        &mut self,
        configs: &[BenchmarkRunConfig],
        document: &BaselineDocument,
        source: &Path,
    ) -> Result<(), ValidationError> {
        for config in configs {
            let key = config.key();
            let expectations = document
                .get(&config.model)
                .and_then(|modes| modes.get(&config.mode))
                .ok_or_else(|| ValidationError::MissingBaseline {
                    report: key.to_string(),
                })?;

            self.modes.insert(config.mode.clone());
            let report = BaselineReport {
                key: key.clone(),
                source: source.to_path_buf(),
                expectations: expectations.clone(),
            };
            if self.reports.insert(key.clone(), report).is_some() {
                warn!(key = %key, source = %source.display(), "Baseline defined more than once, keeping the last");
            }
        }
        Ok(())
    }

    /// Record a skipped suite entry and, when its definition is readable,
    /// the runs it would produce
    pub fn insert_skipped(&mut self, entry: &str, definition: &Path) {
        match DefinitionDocument::load(definition) {
            Ok(document) => {
                for model in &document.models {
                    for mode in &model.modes {
                        self.skipped_modes.insert(mode.mode.clone());
                        self.skipped_runs
                            .insert((mode.mode.clone(), model.model.clone()), entry.to_string());
                    }
                }
            }
            Err(e) => {
                debug!(model = %entry, error = %e, "Skipped definition unreadable, matching its reports by file name");
                self.unread_skips.push(entry.to_string());
            }
        }
        self.skipped.push(entry.to_string());
    }

    pub fn get(&self, key: &RunKey) -> Option<&BaselineReport> {
        self.reports.get(key)
    }

    /// Modes seen across all indexed runs
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.modes.iter().map(String::as_str)
    }

    /// Resolve a result directory name to the key of an indexed baseline
    pub fn resolve(&self, dir_name: &str) -> Option<RunKey> {
        RunKey::candidates(dir_name, self.modes())
            .into_iter()
            .find(|key| self.reports.contains_key(key))
    }

    /// Suite entries left out by the skip list
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Skip entry owning a result directory, if any.
    ///
    /// Directories are matched against the modes and models of readable
    /// skipped definitions. For an unreadable definition the file stem stands
    /// in for the model: `bert_multi_gpu.yaml` owns any `{mode}_bert_multi_gpu`.
    pub fn skipped_owner(&self, dir_name: &str) -> Option<&str> {
        let modes = self
            .modes
            .iter()
            .chain(&self.skipped_modes)
            .map(String::as_str);
        let by_definition = RunKey::candidates(dir_name, modes)
            .into_iter()
            .find_map(|key| self.skipped_runs.get(&(key.mode, key.model)));
        if let Some(entry) = by_definition {
            return Some(entry.as_str());
        }

        let (head, _, _) = split_dir_name(dir_name)?;
        self.unread_skips
            .iter()
            .map(String::as_str)
            .find(|entry| stem_owns_head(entry, head))
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

fn stem_owns_head(entry: &str, head: &str) -> bool {
    let stem = Path::new(entry)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(entry);
    !stem.is_empty()
        && head
            .strip_suffix(stem)
            .is_some_and(|rest| rest.ends_with('_'))
}

/// Read a baseline document; a missing file means the model has no baseline
pub fn load_baseline_document(path: &Path) -> Result<BaselineDocument, ValidationError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ValidationError::MissingBaseline {
                report: path.display().to_string(),
            }
        } else {
            ValidationError::io(path, e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|source| ValidationError::Baseline {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::DefinitionDocument;

    const DEFINITION: &str = r#"
bert:
  eager_mode:
    batch_size: [1, 2]
    workers: [4]
  scripted_mode:
    batch_size: [1]
    workers: [4]
"#;

    const BASELINE: &str = r#"
bert:
  eager_mode:
    TS throughput: 120.5
    TS latency P50: 80
    deviation: 0.2
  scripted_mode:
    TS throughput: 150
    deviation: 0.1
"#;

    fn indexed() -> BaselineSet {
        let configs = DefinitionDocument::from_yaml_str(DEFINITION, "bert.yaml")
            .unwrap()
            .expand();
        let document: BaselineDocument = serde_yaml::from_str(BASELINE).unwrap();
        let mut set = BaselineSet::default();
        set.insert_model(&configs, &document, Path::new("bert.yaml"))
            .unwrap();
        set
    }

    #[test]
    fn test_parse_baseline_document() {
        let document: BaselineDocument = serde_yaml::from_str(BASELINE).unwrap();
        let eager = &document["bert"]["eager_mode"];
        assert_eq!(eager.deviation, 0.2);
        assert_eq!(eager.metrics["TS throughput"], 120.5);
        assert_eq!(eager.metrics["TS latency P50"], 80.0);
        assert!(!eager.metrics.contains_key("deviation"));
    }

    #[test]
    fn test_every_run_indexed_with_its_mode() {
        let set = indexed();
        assert_eq!(set.len(), 3);

        let report = set.get(&RunKey::new("eager_mode", "bert", 4, 2)).unwrap();
        assert_eq!(report.deviation(), 0.2);
        assert_eq!(report.expected("TS throughput"), Some(120.5));

        let report = set.get(&RunKey::new("scripted_mode", "bert", 4, 1)).unwrap();
        assert_eq!(report.deviation(), 0.1);
        assert_eq!(report.expected("TS latency P50"), None);
    }

    #[test]
    fn test_stem_owns_head() {
        assert!(stem_owns_head("bert_multi_gpu.yaml", "eager_mode_bert_multi_gpu"));
        assert!(!stem_owns_head("bert_multi_gpu.yaml", "eager_mode_xbert_multi_gpu"));
        assert!(!stem_owns_head("bert_multi_gpu.yaml", "eager_mode_bert"));
        assert!(!stem_owns_head("bert_multi_gpu.yaml", "bert_multi_gpu"));
    }

    #[test]
    fn test_skipped_owner_by_definition() {
        let dir = tempfile::tempdir().unwrap();
        let definition = dir.path().join("bert_bt.yaml");
        std::fs::write(
            &definition,
            "bert_bt:\n  compiled_mode:\n    batch_size: [1]\n    workers: [4]\n",
        )
        .unwrap();

        let mut set = indexed();
        set.insert_skipped("bert_bt.yaml", &definition);
        set.insert_skipped("vgg_multi.yaml", &dir.path().join("vgg_multi.yaml"));

        assert_eq!(set.skipped(), ["bert_bt.yaml", "vgg_multi.yaml"]);
        // Any batch/workers combination of a skipped (mode, model) is owned
        assert_eq!(
            set.skipped_owner("compiled_mode_bert_bt_w8_b16"),
            Some("bert_bt.yaml")
        );
        assert_eq!(
            set.skipped_owner("eager_mode_vgg_multi_w4_b1"),
            Some("vgg_multi.yaml")
        );
        assert_eq!(set.skipped_owner("compiled_mode_bert_w4_b1"), None);
        assert_eq!(set.skipped_owner("eager_mode_vgg_w4_b1"), None);
    }

    #[test]
    fn test_resolve_dir_name() {
        let set = indexed();
        assert_eq!(
            set.resolve("eager_mode_bert_w4_b1"),
            Some(RunKey::new("eager_mode", "bert", 4, 1))
        );
        assert_eq!(set.resolve("eager_mode_bert_w8_b1"), None);
        assert_eq!(set.resolve("eager_mode_vgg_w4_b1"), None);
    }

    #[test]
    fn test_missing_mode_is_missing_baseline() {
        let configs = DefinitionDocument::from_yaml_str(DEFINITION, "bert.yaml")
            .unwrap()
            .expand();
        let document: BaselineDocument = serde_yaml::from_str(
            "bert:\n  eager_mode:\n    TS throughput: 1\n    deviation: 0.1\n",
        )
        .unwrap();
        let mut set = BaselineSet::default();
        let err = set
            .insert_model(&configs, &document, Path::new("bert.yaml"))
            .unwrap_err();
        match err {
            ValidationError::MissingBaseline { report } => {
                assert_eq!(report, "scripted_mode_bert_w4_b1");
            }
            other => panic!("expected MissingBaseline, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_baseline_file() {
        let err = load_baseline_document(Path::new("/nonexistent/bert.yaml")).unwrap_err();
        assert!(matches!(err, ValidationError::MissingBaseline { .. }));
    }

    #[test]
    fn test_baseline_without_deviation_fails_to_parse() {
        let result: Result<BaselineDocument, _> =
            serde_yaml::from_str("bert:\n  eager_mode:\n    TS throughput: 1\n");
        assert!(result.is_err());
    }
}
