//! citewalk-manifest: Tamper-evident records of sampling runs.
//!
//! A manifest ties a walk corpus to the graph and parameters that produced
//! it. The corpus itself is summarised by a BLAKE3 hash of its `jsonl`
//! form; the manifest fields are in turn covered by a BLAKE3 content hash set on
//! [`CorpusManifest::finalize`], so edits to either are detectable.

pub mod hash;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use citewalk_core::{Corpus, WalkConfig};
use citewalk_graph::GraphStats;

/// Unique identifier for a manifest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ManifestId(pub Uuid);

impl ManifestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ManifestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ManifestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ManifestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Record of one sampling run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorpusManifest {
    pub id: ManifestId,
    pub created_at: DateTime<Utc>,
    /// Shape of the graph the corpus was sampled from.
    pub graph: GraphStats,
    /// Walk parameters used for the run.
    pub config: WalkConfig,
    /// Seed actually used, even when the configuration left it unset.
    pub seed: u64,
    pub root_count: usize,
    pub walk_count: usize,
    pub token_count: usize,
    /// BLAKE3 (hex) of the corpus in `jsonl` layout.
    pub corpus_hash: String,
    /// BLAKE3 content hash (hex) of all other fields, set on finalization.
    pub content_hash: Option<String>,
}

impl CorpusManifest {
    /// Describe a finished run. The manifest still has to be finalized.
    pub fn new(
        graph: GraphStats,
        config: WalkConfig,
        seed: u64,
        root_count: usize,
        corpus: &Corpus,
    ) -> Self {
        Self {
            id: ManifestId::new(),
            created_at: Utc::now(),
            graph,
            config,
            seed,
            root_count,
            walk_count: corpus.len(),
            token_count: corpus.token_count(),
            corpus_hash: hash::corpus_hash(corpus),
            content_hash: None,
        }
    }

    /// Compute and set the content hash.
    pub fn finalize(mut self) -> Self {
        self.content_hash = Some(self.compute_hash());
        self
    }

    /// BLAKE3 hash of every field except `content_hash`.
    pub fn compute_hash(&self) -> String {
        hash::compute_manifest_hash(self)
    }

    /// Verify that the stored content hash matches a freshly computed one.
    pub fn verify_integrity(&self) -> bool {
        match &self.content_hash {
            Some(stored) => stored == &self.compute_hash(),
            None => false,
        }
    }

    /// Whether `corpus` is the corpus this manifest describes.
    pub fn matches_corpus(&self, corpus: &Corpus) -> bool {
        corpus.len() == self.walk_count && hash::corpus_hash(corpus) == self.corpus_hash
    }
}
