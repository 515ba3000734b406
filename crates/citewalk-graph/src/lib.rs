//! citewalk-graph: In-memory undirected graph for citewalk.
//!
//! Nodes are addressed by their external [`NodeId`](citewalk_core::NodeId) and
//! by a dense index. Neighbour lists are kept sorted so the walk sampler can
//! test adjacency with a binary search. The graph is built once and then only
//! read.

pub mod error;
pub mod graph;
pub mod input;

pub use error::GraphError;
pub use graph::{AdjacencyView, GraphNode, GraphStats, InMemoryGraph};
pub use input::{load_graph, EdgeRecord, NodeRecord, SubgraphRecord};
