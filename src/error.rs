//! Error types for blockpin

use thiserror::Error;

/// Result type alias for blockpin operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in blockpin operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Identifier absent from the block store or the pin table
    #[error("CID not found: {0}")]
    NotFound(String),

    /// Stored bytes do not match their identifier
    #[error("Corruption detected: {0}")]
    Corrupt(String),

    /// Malformed identifier, chunk or graph encoding
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error means "no such identifier"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
