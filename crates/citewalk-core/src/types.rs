//! Core domain types shared by every citewalk crate.
//!
//! A [`Walk`] is an ordered run of [`NodeId`]s starting at its root; a
//! [`Corpus`] is every walk of one sampling run, in root-major order.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Nodes ─────────────────────────────────────────────────────────

/// Opaque identifier for a node in the input graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for NodeId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

// ── Walks ─────────────────────────────────────────────────────────

/// An ordered sequence of nodes produced by iterative biased stepping.
///
/// The first element is always the root the walk started from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Walk(pub Vec<NodeId>);

impl Walk {
    /// The node this walk started from.
    pub fn root(&self) -> Option<&NodeId> {
        self.0.first()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.0.iter()
    }
}

impl From<Vec<NodeId>> for Walk {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self(nodes)
    }
}

// ── Corpus ────────────────────────────────────────────────────────

/// All walks of one sampling run.
///
/// Walks are stored root-major, repetition-minor: every walk for the first
/// root, then every walk for the second, and so on. Callers rely on this to
/// re-associate walks with per-root data such as labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Corpus {
    walks: Vec<Walk>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            walks: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, walk: Walk) {
        self.walks.push(walk);
    }

    pub fn walks(&self) -> &[Walk] {
        &self.walks
    }

    pub fn into_walks(self) -> Vec<Walk> {
        self.walks
    }

    /// Number of walks.
    pub fn len(&self) -> usize {
        self.walks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walks.is_empty()
    }

    /// Total number of node occurrences across all walks.
    pub fn token_count(&self) -> usize {
        self.walks.iter().map(Walk::len).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Walk> {
        self.walks.iter()
    }

    /// Split the corpus back into one block of walks per root.
    ///
    /// `walks_per_root` must be the value the corpus was sampled with.
    pub fn per_root(&self, walks_per_root: usize) -> std::slice::Chunks<'_, Walk> {
        // An empty corpus yields no chunks for any size, including 0 walks per root.
        self.walks.chunks(walks_per_root.max(1))
    }
}

impl FromIterator<Walk> for Corpus {
    fn from_iter<I: IntoIterator<Item = Walk>>(iter: I) -> Self {
        Self {
            walks: iter.into_iter().collect(),
        }
    }
}

impl Extend<Walk> for Corpus {
    fn extend<I: IntoIterator<Item = Walk>>(&mut self, iter: I) {
        self.walks.extend(iter);
    }
}

impl IntoIterator for Corpus {
    type Item = Walk;
    type IntoIter = std::vec::IntoIter<Walk>;

    fn into_iter(self) -> Self::IntoIter {
        self.walks.into_iter()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Walk;
    type IntoIter = std::slice::Iter<'a, Walk>;

    fn into_iter(self) -> Self::IntoIter {
        self.walks.iter()
    }
}
