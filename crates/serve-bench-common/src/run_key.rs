//! Structured key joining run configurations, baselines and result directories
//!
//! Result directories are named `{mode}_{model}_w{workers}_b{batch_size}`.
//! Both mode and model names may contain underscores, so a directory name
//! cannot be split on its own; [`RunKey::candidates`] resolves it against the
//! set of modes known from the expanded definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one benchmark run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunKey {
    /// Execution mode (e.g. "eager_mode")
    pub mode: String,
    /// Model name as it appears in the definition document
    pub model: String,
    /// Number of model workers
    pub workers: u32,
    /// Inference batch size
    pub batch_size: u32,
}

impl RunKey {
    pub fn new(
        mode: impl Into<String>,
        model: impl Into<String>,
        workers: u32,
        batch_size: u32,
    ) -> Self {
        Self {
            mode: mode.into(),
            model: model.into(),
            workers,
            batch_size,
        }
    }

    /// Name of the result directory the benchmark harness writes for this run
    pub fn dir_name(&self) -> String {
        format!(
            "{}_{}_w{}_b{}",
            self.mode, self.model, self.workers, self.batch_size
        )
    }

    /// All keys a directory name could denote given the known modes.
    ///
    /// Longer modes come first so that `eager_mode` wins over `eager` when both
    /// are prefixes. Returns an empty list when the `_w{N}_b{N}` suffix is
    /// missing or no mode matches.
    pub fn candidates<'a, I>(dir_name: &str, modes: I) -> Vec<RunKey>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let Some((head, workers, batch_size)) = split_dir_name(dir_name) else {
            return Vec::new();
        };

        let mut keys: Vec<RunKey> = modes
            .into_iter()
            .filter_map(|mode| {
                let model = head.strip_prefix(mode)?.strip_prefix('_')?;
                (!model.is_empty()).then(|| RunKey::new(mode, model, workers, batch_size))
            })
            .collect();

        keys.sort_by(|a, b| b.mode.len().cmp(&a.mode.len()).then_with(|| a.cmp(b)));
        keys.dedup();
        keys
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir_name())
    }
}

/// Split a result directory name into its `{mode}_{model}` head, workers and
/// batch size.
pub fn split_dir_name(name: &str) -> Option<(&str, u32, u32)> {
    let (rest, batch) = name.rsplit_once("_b")?;
    let batch_size = parse_count(batch)?;
    let (head, workers) = rest.rsplit_once("_w")?;
    let workers = parse_count(workers)?;
    if head.is_empty() {
        return None;
    }
    Some((head, workers, batch_size))
}

// `str::parse::<u32>` accepts a leading '+', which never appears in a
// directory we wrote ourselves.
fn parse_count(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
