//! Configuration management for citewalk.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`CITEWALK_` prefix, `__` between sections,
//!    e.g. `CITEWALK_WALK__RETURN_BIAS=0.25`)
//! 2. Config file (`citewalk.toml`, or any prefix passed to [`CitewalkConfig::load`])
//! 3. Defaults

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CitewalkError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CitewalkConfig {
    #[serde(default)]
    pub walk: WalkConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl CitewalkConfig {
    /// Load configuration from `{file_prefix}.{toml,json,yaml,...}` and the
    /// environment. A missing file is not an error.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("CITEWALK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CitewalkError::Config(e.to_string()))?;

        let loaded: Self = cfg
            .try_deserialize()
            .map_err(|e| CitewalkError::Config(e.to_string()))?;

        tracing::debug!(
            file_prefix,
            length = loaded.walk.length,
            walks_per_root = loaded.walk.walks_per_root,
            "Configuration loaded"
        );

        Ok(loaded)
    }
}

/// Parameters of a biased walk run.
///
/// Values are not validated here; the sampler rejects a bad configuration
/// before emitting any walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Maximum number of nodes per walk, root included.
    #[serde(default = "default_length")]
    pub length: usize,

    /// Walks sampled from every root.
    #[serde(default = "default_walks_per_root")]
    pub walks_per_root: usize,

    /// Return parameter `p`. Larger values make stepping back less likely.
    #[serde(default = "default_return_bias")]
    pub return_bias: f64,

    /// In-out parameter `q`. Larger values keep the walk local,
    /// smaller values push it outward.
    #[serde(default = "default_explore_bias")]
    pub explore_bias: f64,

    /// Seed for reproducible corpora.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Spread roots over the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

fn default_length() -> usize {
    100
}

fn default_walks_per_root() -> usize {
    10
}

fn default_return_bias() -> f64 {
    0.5
}

fn default_explore_bias() -> f64 {
    2.0
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            walks_per_root: default_walks_per_root(),
            return_bias: default_return_bias(),
            explore_bias: default_explore_bias(),
            seed: None,
            parallel: false,
        }
    }
}

/// Where and how the corpus is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: CorpusFormat,

    /// Directory for run manifests. No manifest is recorded when unset.
    #[serde(default)]
    pub manifest_dir: Option<String>,
}

/// On-disk layout of a walk corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusFormat {
    /// One walk per line, node ids separated by spaces.
    #[default]
    Text,
    /// One JSON array of node ids per line.
    Jsonl,
}

impl CorpusFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Jsonl => "jsonl",
        }
    }
}

impl FromStr for CorpusFormat {
    type Err = CitewalkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "jsonl" | "json-lines" => Ok(Self::Jsonl),
            _ => Err(CitewalkError::UnknownFormat(s.to_string())),
        }
    }
}
