//! In-memory graph representation for walk sampling.
//!
//! Converts node and edge records into a compact, sorted adjacency list so
//! that neighbour enumeration is a slice borrow and adjacency tests are a
//! binary search.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use citewalk_core::NodeId;

use crate::error::{GraphError, Result};
use crate::input::{EdgeRecord, NodeRecord};

/// Read-only adjacency view consumed by the walk sampler.
///
/// Implementations must return neighbour lists sorted ascending by dense
/// index and free of duplicates; [`AdjacencyView::is_adjacent`] relies on it.
pub trait AdjacencyView {
    /// Number of nodes; dense indices are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Dense index of an external node id.
    fn index_of(&self, id: &NodeId) -> Option<usize>;

    /// External id of a dense index. Panics if `index` is out of range.
    fn id_of(&self, index: usize) -> &NodeId;

    /// Sorted neighbour indices of `index`.
    fn neighbor_indices(&self, index: usize) -> &[usize];

    /// Membership test.
    fn contains(&self, id: &NodeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Neighbours of a node by external id, or `None` if the node is absent.
    fn neighbors(&self, id: &NodeId) -> Option<Vec<&NodeId>> {
        let index = self.index_of(id)?;
        Some(
            self.neighbor_indices(index)
                .iter()
                .map(|&n| self.id_of(n))
                .collect(),
        )
    }

    fn degree(&self, index: usize) -> usize {
        self.neighbor_indices(index).len()
    }

    fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbor_indices(a).binary_search(&b).is_ok()
    }
}

/// Node metadata stored in the in-memory graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Dense index (0..N-1).
    pub index: usize,
    /// External node id (paper id for citation data).
    pub id: NodeId,
    /// Optional class label, e.g. the paper subject. Not used by sampling.
    pub label: Option<String>,
    /// Free-form attributes carried through from the input.
    pub properties: serde_json::Value,
}

/// Summary statistics of a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub isolated_count: usize,
    pub self_loop_count: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
}

/// Undirected graph with sorted neighbour lists.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    nodes: Vec<GraphNode>,
    adjacency: Vec<Vec<usize>>,
    node_index: HashMap<NodeId, usize>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from node and edge records.
    ///
    /// Edges naming a node that is not in `nodes` are skipped.
    pub fn from_records(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Self {
        let mut graph = Self {
            nodes: Vec::with_capacity(nodes.len()),
            adjacency: Vec::with_capacity(nodes.len()),
            node_index: HashMap::with_capacity(nodes.len()),
        };

        for record in nodes {
            graph.add_node(
                record.id,
                record.label,
                record.properties.unwrap_or(serde_json::Value::Null),
            );
        }

        let mut skipped = 0usize;
        for edge in &edges {
            match (
                graph.node_index.get(&edge.source).copied(),
                graph.node_index.get(&edge.target).copied(),
            ) {
                (Some(a), Some(b)) => {
                    graph.adjacency[a].push(b);
                    if a != b {
                        graph.adjacency[b].push(a);
                    }
                }
                _ => skipped += 1,
            }
        }

        for neighbors in &mut graph.adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        if skipped > 0 {
            tracing::warn!(
                skipped,
                total = edges.len(),
                "Skipped edges referencing unknown nodes"
            );
        }

        graph
    }

    /// Add a node, or return the index of an existing node with the same id.
    pub fn add_node(
        &mut self,
        id: NodeId,
        label: Option<String>,
        properties: serde_json::Value,
    ) -> usize {
        if let Some(&index) = self.node_index.get(&id) {
            return index;
        }

        let index = self.nodes.len();
        self.node_index.insert(id.clone(), index);
        self.nodes.push(GraphNode {
            index,
            id,
            label,
            properties,
        });
        self.adjacency.push(Vec::new());
        index
    }

    /// Add an undirected edge between two existing nodes.
    ///
    /// Adding an edge that already exists is a no-op.
    pub fn add_edge(&mut self, a: &NodeId, b: &NodeId) -> Result<()> {
        let ia = self.require(a)?;
        let ib = self.require(b)?;
        insert_sorted(&mut self.adjacency[ia], ib);
        if ia != ib {
            insert_sorted(&mut self.adjacency[ib], ia);
        }
        Ok(())
    }

    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// External ids of every node, in dense index order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges; a self-loop counts once.
    pub fn edge_count(&self) -> usize {
        let self_loops = self.self_loop_count();
        let endpoints: usize = self.adjacency.iter().map(Vec::len).sum();
        (endpoints - self_loops) / 2 + self_loops
    }

    /// Indices of nodes without neighbours.
    pub fn isolated_nodes(&self) -> Vec<usize> {
        self.adjacency
            .iter()
            .enumerate()
            .filter(|(_, neighbors)| neighbors.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        let node_count = self.node_count();
        let endpoints: usize = self.adjacency.iter().map(Vec::len).sum();
        GraphStats {
            node_count,
            edge_count: self.edge_count(),
            isolated_count: self.isolated_nodes().len(),
            self_loop_count: self.self_loop_count(),
            max_degree: self.adjacency.iter().map(Vec::len).max().unwrap_or(0),
            mean_degree: if node_count == 0 {
                0.0
            } else {
                endpoints as f64 / node_count as f64
            },
        }
    }

    fn self_loop_count(&self) -> usize {
        self.adjacency
            .iter()
            .enumerate()
            .filter(|(i, neighbors)| neighbors.binary_search(i).is_ok())
            .count()
    }

    fn require(&self, id: &NodeId) -> Result<usize> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode {
                node_id: id.to_string(),
            })
    }
}

impl AdjacencyView for InMemoryGraph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    fn id_of(&self, index: usize) -> &NodeId {
        &self.nodes[index].id
    }

    fn neighbor_indices(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }
}

fn insert_sorted(list: &mut Vec<usize>, value: usize) {
    if let Err(pos) = list.binary_search(&value) {
        list.insert(pos, value);
    }
}
