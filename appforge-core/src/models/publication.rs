//! Publication (deployment) types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Publication Status
// ============================================================================

/// Remote status of a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicationStatus {
    /// Publication accepted, waiting to run.
    Queued,
    /// Deployment in progress.
    Running,
    /// Deployment finished successfully.
    Finished,
    /// Deployment failed remotely.
    Failed,
    /// Status string not recognized by this client.
    #[serde(other)]
    Unknown,
}

impl PublicationStatus {
    /// Returns true for states the publication can never leave.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Publication
// ============================================================================

/// Snapshot of a remote publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    /// Opaque publication identifier.
    pub publication_key: String,
    /// Last observed status.
    pub status: PublicationStatus,
    /// Key of the application being published.
    #[serde(default)]
    pub application_key: Option<String>,
    /// Revision being published.
    #[serde(default)]
    pub application_revision: Option<u32>,
}

// ============================================================================
// Tests
// ============================================================================
