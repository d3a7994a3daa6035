//! User-facing error sanitization.
//!
//! The progress sequence's final string on failure comes from the small
//! fixed set below. Raw status codes, response bodies, and internal URLs
//! never pass through here; they stay in the structured logs.

use appforge_client::ClientError;
use appforge_core::CoreError;

use crate::error::EngineError;

/// Maps an engine error to its user-safe message.
pub fn user_message(error: &EngineError) -> String {
    match error {
        EngineError::Client(ClientError::Timeout(_)) | EngineError::PollTimeout { .. } => {
            "request timed out, try again".to_string()
        }
        EngineError::Client(ClientError::RateLimited { .. }) => {
            "rate limited, try again shortly".to_string()
        }
        EngineError::Client(client) => match client.status() {
            Some(401 | 403) => "authentication failed, check credentials".to_string(),
            Some(status) if (500..600).contains(&status) => {
                "service temporarily unavailable".to_string()
            }
            _ => "an error occurred, try again".to_string(),
        },
        EngineError::Core(CoreError::AuthenticationFailed) => {
            "authentication failed, check credentials".to_string()
        }
        // Our own validation text, safe to show as-is.
        EngineError::Core(CoreError::InvalidPrompt(message)) => message.clone(),
        _ => "an error occurred, try again".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
