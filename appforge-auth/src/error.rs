//! Authentication error types.
//!
//! These errors are internal to the exchange: they carry enough detail for
//! diagnostics but are logged rather than returned across the crate
//! boundary. The public surface collapses every variant into the generic
//! [`CoreError::AuthenticationFailed`](appforge_core::CoreError), because the
//! exchange transits third-party identity systems whose error payloads may
//! contain sensitive detail.

use thiserror::Error;

/// Error type for the federated authentication exchange.
#[derive(Debug, Error)]
pub enum AuthError {
    /// OIDC metadata discovery failed.
    #[error("OIDC discovery failed: {0}")]
    Discovery(String),

    /// The authorization request did not yield a usable redirect.
    #[error("Authorization initiation failed: {0}")]
    Authorization(String),

    /// The federated pool configuration could not be fetched.
    #[error("Identity pool configuration failed: {0}")]
    PoolConfig(String),

    /// The SRP login against the federated pool failed.
    #[error("Federated login failed: {0}")]
    FederatedLogin(String),

    /// A code-exchange hop failed.
    #[error("Code exchange failed: {0}")]
    CodeExchange(String),

    /// The token endpoint rejected the final exchange.
    #[error("Token endpoint failed: {0}")]
    TokenEndpoint(String),

    /// Cryptographic operation failed.
    #[error("Crypto failure: {0}")]
    Crypto(String),

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unparseable response.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
