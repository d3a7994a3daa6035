//! Generation job types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Job Status
// ============================================================================

/// Remote status of a generation job.
///
/// `Unknown` is the escape hatch for status strings introduced server-side
/// after this client shipped: it deserializes cleanly and polls treat it as
/// still in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    /// Job accepted, not yet prepared.
    Pending,
    /// Job prepared; generation may be triggered.
    ReadyToGenerate,
    /// Generation in progress.
    Generating,
    /// Generation finished successfully.
    Done,
    /// Generation failed remotely.
    Failed,
    /// Status string not recognized by this client.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Returns true for states the job can never leave.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ReadyToGenerate => "ready to generate",
            Self::Generating => "generating",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Generation Job
// ============================================================================

/// Snapshot of a remote generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationJob {
    /// Opaque job identifier.
    pub job_id: String,
    /// Last observed status.
    pub status: JobStatus,
    /// Generated application specification, present once the job is done.
    #[serde(default)]
    pub app_spec: Option<AppSpec>,
}

impl GenerationJob {
    /// Returns the generated application key, if the job has produced one.
    pub fn application_key(&self) -> Option<&str> {
        self.app_spec
            .as_ref()
            .map(|spec| spec.app_key.as_str())
            .filter(|key| !key.is_empty())
    }
}

/// Application specification attached to a completed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSpec {
    /// Key of the generated application.
    pub app_key: String,
}

// ============================================================================
// Tests
// ============================================================================
