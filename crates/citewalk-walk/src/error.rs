//! Error types for the citewalk-walk crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Root node not found in graph: {node_id}")]
    InvalidNode { node_id: String },

    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WalkError>;
