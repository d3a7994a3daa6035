//! Core error types for `AppForge`.

use thiserror::Error;

/// Core error type for `AppForge` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller-supplied prompt is out of bounds.
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    /// Invalid or incomplete configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Authentication failed.
    ///
    /// Deliberately carries no detail: the federated exchange transits
    /// third-party identity systems whose error payloads may contain
    /// sensitive diagnostics. The underlying cause is logged, never surfaced.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Invalid data from an API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (configuration files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
