//! Common error types for songbook

use thiserror::Error;

/// Common result type for songbook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds shared by the repository, the aggregator and configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Store unreachable or query failure (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No record at the given id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or malformed required fields
    #[error("{0}")]
    Validation(String),

    /// Failure while computing statistics
    #[error("Aggregation error: {0}")]
    Aggregation(String),
}
