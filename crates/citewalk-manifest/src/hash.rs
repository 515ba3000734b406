//! BLAKE3 hashing of corpora and manifests.

use serde::Serialize;

use citewalk_core::{Corpus, WalkConfig};
use citewalk_graph::GraphStats;

use crate::{CorpusManifest, ManifestId};

/// Hashable view of a manifest (excludes `content_hash`).
#[derive(Serialize)]
struct HashableManifest<'a> {
    id: &'a ManifestId,
    created_at: &'a chrono::DateTime<chrono::Utc>,
    graph: &'a GraphStats,
    config: &'a WalkConfig,
    seed: u64,
    root_count: usize,
    walk_count: usize,
    token_count: usize,
    corpus_hash: &'a str,
}

/// Compute the BLAKE3 hash of a manifest's content.
///
/// Serializes all fields except `content_hash` to JSON and hashes the bytes.
/// Returns the hex-encoded hash.
pub fn compute_manifest_hash(manifest: &CorpusManifest) -> String {
    let hashable = HashableManifest {
        id: &manifest.id,
        created_at: &manifest.created_at,
        graph: &manifest.graph,
        config: &manifest.config,
        seed: manifest.seed,
        root_count: manifest.root_count,
        walk_count: manifest.walk_count,
        token_count: manifest.token_count,
        corpus_hash: &manifest.corpus_hash,
    };

    let json = serde_json::to_vec(&hashable).expect("Manifest serialization should not fail");
    blake3::hash(&json).to_hex().to_string()
}

/// BLAKE3 hash of a corpus.
///
/// Each walk is hashed as a JSON array of ids followed by `\n`, i.e. the
/// bytes of the `jsonl` corpus format. Ids containing whitespace therefore
/// cannot make two different corpora collide.
pub fn corpus_hash(corpus: &Corpus) -> String {
    let mut hasher = blake3::Hasher::new();
    for walk in corpus {
        serde_json::to_writer(&mut hasher, walk).expect("Walk serialization should not fail");
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use citewalk_core::{NodeId, Walk};

    fn corpus(walks: &[&[&str]]) -> Corpus {
        walks
            .iter()
            .map(|ids| Walk(ids.iter().map(|id| NodeId::from(*id)).collect()))
            .collect()
    }

    #[test]
    fn test_corpus_hash_matches_jsonl_bytes() {
        let corpus = corpus(&[&["35", "1033"], &["1688"]]);
        let expected = blake3::hash(b"[\"35\",\"1033\"]\n[\"1688\"]\n");
        assert_eq!(corpus_hash(&corpus), expected.to_hex().to_string());
    }

    #[test]
    fn test_walk_boundaries_change_the_hash() {
        let joined = corpus(&[&["a", "b"]]);
        let split = corpus(&[&["a"], &["b"]]);
        assert_ne!(corpus_hash(&joined), corpus_hash(&split));
    }

    #[test]
    fn test_whitespace_in_ids_does_not_collide() {
        let left = corpus(&[&["a b", "c"]]);
        let right = corpus(&[&["a", "b c"]]);
        assert_ne!(corpus_hash(&left), corpus_hash(&right));
    }

    #[test]
    fn test_empty_corpus_hashes_empty_input() {
        assert_eq!(corpus_hash(&Corpus::new()), blake3::hash(b"").to_hex().to_string());
    }
}
