//! Error types for workshop-sync
//!
//! Steady-state engine operations degrade to no-ops on failure (see the
//! module docs on [`crate::engine`]); these types cover the fallible seams:
//! configuration loading and calls into the remote provider.

use thiserror::Error;

/// Result type alias for workshop-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for workshop-sync
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "poll_interval")
        key: Option<String>,
    },

    /// Remote provider call failed
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Errors originating in the remote provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider rejected or could not issue a batched metadata query
    #[error("metadata query failed: {0}")]
    QueryFailed(String),

    /// The provider reported a non-success result code for a completed query
    #[error("metadata query returned failure code {0}")]
    QueryResult(i32),

    /// The provider connection is unavailable
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}
