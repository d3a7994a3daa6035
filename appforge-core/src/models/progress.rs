//! Orchestration progress events.

use serde::{Deserialize, Serialize};

/// One event in the lazy progress sequence of an orchestration run.
///
/// The sequence is single-pass and non-restartable: a consumer sees zero or
/// more `Progress` events followed by exactly one terminal event. Dropping
/// the receiving end cancels the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "text", rename_all = "snake_case")]
pub enum OrchestrationEvent {
    /// A completed stage or periodic polling update.
    Progress(String),
    /// Terminal success carrying the live application URL.
    Completed(String),
    /// Terminal failure carrying a sanitized, user-safe message.
    Failed(String),
}

impl OrchestrationEvent {
    /// Returns the human-readable text of this event.
    pub fn text(&self) -> &str {
        match self {
            Self::Progress(text) | Self::Completed(text) | Self::Failed(text) => text,
        }
    }

    /// Returns true if this event ends the sequence.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        assert!(!OrchestrationEvent::Progress("working".into()).is_terminal());
        assert!(OrchestrationEvent::Completed("https://x".into()).is_terminal());
        assert!(OrchestrationEvent::Failed("oops".into()).is_terminal());
    }

    #[test]
    fn test_json_shape() {
        let event = OrchestrationEvent::Progress("Submitting generation job".into());
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"event":"progress","text":"Submitting generation job"}"#
        );
    }
}
