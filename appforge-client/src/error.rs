//! Client error types.

use std::time::Duration;
use thiserror::Error;

/// Error type for outbound API calls.
///
/// `Api` deliberately omits the response body from its `Display` output: the
/// body is retained for internal diagnostics but must never be echoed to end
/// users.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response within the per-call deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered 429.
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying, from the Retry-After header.
        retry_after: Option<u64>,
    },

    /// Non-success status code.
    #[error("API error: HTTP {status}")]
    Api {
        /// Numeric HTTP status.
        status: u16,
        /// Raw response body, for internal diagnostics only.
        body: String,
    },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Returns the HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_display_omits_body() {
        let error = ClientError::Api {
            status: 500,
            body: "stack trace with secrets".to_string(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("500"));
        assert!(!rendered.contains("secrets"));
    }

    #[test]
    fn test_status() {
        let error = ClientError::Api {
            status: 404,
            body: String::new(),
        };
        assert_eq!(error.status(), Some(404));
        assert_eq!(
            ClientError::RateLimited { retry_after: None }.status(),
            Some(429)
        );
        assert_eq!(ClientError::Timeout(Duration::from_secs(15)).status(), None);
    }
}
