//! citewalk-core: Shared types, configuration, and error handling for citewalk.
//!
//! This crate provides the foundational types used across all citewalk crates:
//! - Node identifiers, walks, and the walk corpus
//! - Walk and output configuration
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{CitewalkConfig, CorpusFormat, OutputConfig, WalkConfig};
pub use error::CitewalkError;
pub use types::{Corpus, NodeId, Walk};
