use thiserror::Error;

/// Top-level error type for citewalk.
#[derive(Error, Debug)]
pub enum CitewalkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown corpus format: {0} (expected text or jsonl)")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, CitewalkError>;
