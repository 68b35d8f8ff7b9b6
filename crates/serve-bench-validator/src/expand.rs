//! Model definition loading and expansion into run configurations
//!
//! A definition document maps model names to modes, and each mode to its
//! settings. The two list-valued settings, `batch_size` and `workers`, are
//! expanded by cross product: batch size varies slowest, workers fastest.
//! Every other setting is copied into each resulting configuration.

use crate::error::DefinitionError;
use serde_yaml::{Mapping, Value};
use serve_bench_common::BenchmarkRunConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BATCH_SIZE_KEY: &str = "batch_size";
const WORKERS_KEY: &str = "workers";

/// Benchmark settings of one model in one execution mode
#[derive(Debug, Clone, PartialEq)]
pub struct ModeDefinition {
    pub mode: String,
    pub batch_size: Vec<u32>,
    pub workers: Vec<u32>,
    /// Scalar settings carried into every run of this mode
    pub settings: BTreeMap<String, Value>,
}

impl ModeDefinition {
    /// Number of runs this mode expands into
    pub fn run_count(&self) -> usize {
        self.batch_size.len() * self.workers.len()
    }

    /// Expand into one configuration per (batch_size, workers) pair
    pub fn expand<'a>(&'a self, model: &'a str) -> impl Iterator<Item = BenchmarkRunConfig> + 'a {
        self.batch_size.iter().flat_map(move |&batch_size| {
            self.workers.iter().map(move |&workers| BenchmarkRunConfig {
                model: model.to_string(),
                mode: self.mode.clone(),
                batch_size,
                workers,
                settings: self.settings.clone(),
            })
        })
    }
}

/// All modes defined for one model, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefinition {
    pub model: String,
    pub modes: Vec<ModeDefinition>,
}

/// A parsed model definition document
#[derive(Debug, Clone)]
pub struct DefinitionDocument {
    /// File the document was read from, used in error messages
    pub path: PathBuf,
    pub models: Vec<ModelDefinition>,
}

impl DefinitionDocument {
    /// Load and parse a definition document from disk
    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DefinitionError::io(path, e))?;
        Self::from_yaml_str(&content, path)
    }

    /// Parse a definition document; `path` is only used for error context
    pub fn from_yaml_str(content: &str, path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let root: Value =
            serde_yaml::from_str(content).map_err(|source| DefinitionError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let Value::Mapping(root) = root else {
            return Err(DefinitionError::malformed(
                path,
                "expected a mapping of model names to modes",
            ));
        };

        let mut models = Vec::with_capacity(root.len());
        for (model_key, modes) in &root {
            let model = key_name(model_key)
                .ok_or_else(|| DefinitionError::malformed(path, "model names must be strings"))?;
            let Value::Mapping(modes) = modes else {
                return Err(DefinitionError::malformed(
                    path,
                    format!("model '{model}' must map mode names to settings"),
                ));
            };

            let mut parsed_modes = Vec::with_capacity(modes.len());
            for (mode_key, settings) in modes {
                let mode = key_name(mode_key).ok_or_else(|| {
                    DefinitionError::malformed(
                        path,
                        format!("mode names of model '{model}' must be strings"),
                    )
                })?;
                let Value::Mapping(settings) = settings else {
                    return Err(DefinitionError::malformed(
                        path,
                        format!("model '{model}', mode '{mode}' must be a mapping of settings"),
                    ));
                };
                parsed_modes.push(parse_mode(path, &model, mode, settings)?);
            }

            models.push(ModelDefinition {
                model,
                modes: parsed_modes,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            models,
        })
    }

    /// Expand every model and mode into run configurations, in document order
    pub fn expand(&self) -> Vec<BenchmarkRunConfig> {
        let mut configs = Vec::with_capacity(self.run_count());
        for model in &self.models {
            for mode in &model.modes {
                configs.extend(mode.expand(&model.model));
            }
        }
        configs
    }

    /// Total number of runs the document expands into
    pub fn run_count(&self) -> usize {
        self.models
            .iter()
            .flat_map(|m| m.modes.iter())
            .map(ModeDefinition::run_count)
            .sum()
    }
}

/// Load a definition file and expand it into run configurations
pub fn expand_file(path: &Path) -> Result<Vec<BenchmarkRunConfig>, DefinitionError> {
    let document = DefinitionDocument::load(path)?;
    let configs = document.expand();
    info!(
        path = %path.display(),
        models = document.models.len(),
        configs = configs.len(),
        "Expanded model definition"
    );
    Ok(configs)
}

fn parse_mode(
    path: &Path,
    model: &str,
    mode: String,
    settings: &Mapping,
) -> Result<ModeDefinition, DefinitionError> {
    let mut batch_size = None;
    let mut workers = None;
    let mut carried = BTreeMap::new();

    for (key, value) in settings {
        let Some(name) = key_name(key) else {
            return Err(DefinitionError::malformed(
                path,
                format!("setting names of model '{model}', mode '{mode}' must be strings"),
            ));
        };
        match name.as_str() {
            BATCH_SIZE_KEY => {
                batch_size = Some(parse_counts(path, model, &mode, BATCH_SIZE_KEY, value)?);
            }
            WORKERS_KEY => {
                workers = Some(parse_counts(path, model, &mode, WORKERS_KEY, value)?);
            }
            _ => {
                carried.insert(name, value.clone());
            }
        }
    }

    let missing = |field| DefinitionError::MissingField {
        path: path.to_path_buf(),
        model: model.to_string(),
        mode: mode.clone(),
        field,
    };
    let batch_size = batch_size.ok_or_else(|| missing(BATCH_SIZE_KEY))?;
    let workers = workers.ok_or_else(|| missing(WORKERS_KEY))?;

    debug!(
        model,
        mode = %mode,
        batch_sizes = batch_size.len(),
        workers = workers.len(),
        "Parsed mode definition"
    );

    Ok(ModeDefinition {
        mode,
        batch_size,
        workers,
        settings: carried,
    })
}

fn parse_counts(
    path: &Path,
    model: &str,
    mode: &str,
    field: &str,
    value: &Value,
) -> Result<Vec<u32>, DefinitionError> {
    let invalid = || {
        DefinitionError::malformed(
            path,
            format!(
                "'{field}' of model '{model}', mode '{mode}' must be a list of non-negative integers"
            ),
        )
    };

    let Value::Sequence(items) = value else {
        return Err(invalid());
    };
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(invalid)
        })
        .collect()
}

fn key_name(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
