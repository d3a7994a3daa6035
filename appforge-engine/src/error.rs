//! Engine error types.

use std::time::Duration;
use thiserror::Error;

use appforge_client::{ClientError, Retryable};
use appforge_core::CoreError;

/// Error type for orchestration runs.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Validation, configuration, or authentication failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An outbound call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A polled remote entity reached a terminal failure state.
    ///
    /// The embedded status is a known enum label, safe to surface.
    #[error("{entity} failed remotely (status: {status})")]
    RemoteFailure {
        /// What failed: "generation job" or "publication".
        entity: &'static str,
        /// Last observed status label.
        status: &'static str,
    },

    /// A polling stage exhausted its attempt budget.
    #[error("Polling gave up after {attempts} attempts")]
    PollTimeout {
        /// Number of polls issued.
        attempts: u32,
    },

    /// A required field was absent from an otherwise successful response.
    #[error("{entity} response is missing {field}")]
    MissingField {
        /// The entity that was fetched.
        entity: &'static str,
        /// The absent field.
        field: &'static str,
    },

    /// The progress consumer went away; the run stopped issuing calls.
    #[error("Orchestration cancelled by consumer")]
    Cancelled,
}

impl Retryable for EngineError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Client(client) => client.is_retryable(),
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Client(client) => client.retry_after(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_classification_is_delegated() {
        let retryable = EngineError::Client(ClientError::Api {
            status: 503,
            body: String::new(),
        });
        assert!(retryable.is_retryable());

        let fatal = EngineError::Client(ClientError::Api {
            status: 404,
            body: String::new(),
        });
        assert!(!fatal.is_retryable());
    }

    #[test]
    fn test_non_client_errors_never_retry() {
        assert!(!EngineError::Cancelled.is_retryable());
        assert!(!EngineError::PollTimeout { attempts: 9 }.is_retryable());
        assert!(!EngineError::Core(CoreError::AuthenticationFailed).is_retryable());
    }
}
