//! Error types for sift-core

use thiserror::Error;

/// Result type alias using sift-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sift-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// `SQLite` error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Content item not found
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Permission lookup failed
    #[error("Permission error: {0}")]
    Permission(String),

    /// The document store could not be reached or answered with garbage
    #[error("Store error: {0}")]
    Store(String),
}
