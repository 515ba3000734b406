//! citewalk-walk: Biased second-order random walks for citation graphs.
//!
//! Produces the walk corpus a Node2Vec-style embedding trainer consumes:
//! for every requested root, a fixed number of walks whose steps are biased
//! by a return parameter `p` and an in-out parameter `q`.
//!
//! ```
//! use citewalk_core::{NodeId, WalkConfig};
//! use citewalk_graph::InMemoryGraph;
//! use citewalk_walk::BiasedWalkSampler;
//!
//! let mut graph = InMemoryGraph::new();
//! for id in ["a", "b", "c"] {
//!     graph.add_node(NodeId::from(id), None, serde_json::Value::Null);
//! }
//! graph.add_edge(&NodeId::from("a"), &NodeId::from("b")).unwrap();
//! graph.add_edge(&NodeId::from("b"), &NodeId::from("c")).unwrap();
//!
//! let config = WalkConfig { length: 5, walks_per_root: 2, ..WalkConfig::default() };
//! let corpus = BiasedWalkSampler::with_seed(7)
//!     .run(&graph, &[NodeId::from("a")], &config)
//!     .unwrap();
//! assert_eq!(corpus.len(), 2);
//! ```

pub mod corpus;
pub mod error;
pub mod sampler;

pub use corpus::{read_corpus, write_corpus};
pub use error::WalkError;
pub use sampler::{
    transition_weights, validate_config, walk_from, weighted_choice, BiasedWalkSampler,
    TransitionBias, WalkState,
};
