//! Common error types for Lessonbox

use thiserror::Error;

/// Common result type for Lessonbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Lessonbox crates
#[derive(Error, Debug)]
pub enum Error {
    /// Requested lesson path does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network retrieval failed after every fallback tier
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Malformed document or response payload
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
