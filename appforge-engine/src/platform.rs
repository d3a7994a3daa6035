//! The platform API seam.
//!
//! [`PlatformApi`] abstracts the six remote operations the orchestrator
//! needs; [`HttpPlatform`] is the real implementation over the tenant's
//! management API. The request structs are wire-format contracts: field
//! names and shapes must match the remote API exactly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use appforge_client::ApiClient;
use appforge_core::{ApplicationDetails, CredentialSource, GenerationJob, Publication};

use crate::error::EngineError;

/// Deadline for status reads.
pub const STATUS_READ_TIMEOUT: Duration = Duration::from_secs(15);

/// Deadline for mutating calls.
pub const MUTATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Revision published for a freshly generated application.
const INITIAL_REVISION: u32 = 1;

// ============================================================================
// Wire Types
// ============================================================================

/// Body of the job-creation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    /// The generation prompt.
    pub prompt: String,
    /// Attached files; always empty for prompt-only generation.
    pub files: Vec<serde_json::Value>,
    /// The platform requires this flag for standalone generation requests.
    pub ignore_tenant_context: bool,
}

/// Body of the publication-creation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublicationRequest {
    /// Application to publish.
    pub application_key: String,
    /// Revision to publish.
    pub application_revision: u32,
    /// Always null: the platform resolves the artifact itself.
    pub download_url: Option<String>,
}

/// Response of the job-creation call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedJob {
    /// Identifier of the new job.
    pub job_id: String,
}

/// Response of the publication-creation call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPublication {
    /// Identifier of the new publication.
    pub publication_key: String,
}

// ============================================================================
// Platform API
// ============================================================================

/// The remote operations one orchestration run is built from.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Creates a generation job for the prompt.
    async fn create_job(&self, prompt: &str) -> Result<CreatedJob, EngineError>;

    /// Fetches the current job snapshot.
    async fn job_status(&self, job_id: &str) -> Result<GenerationJob, EngineError>;

    /// Triggers the generation phase of a ready job.
    async fn trigger_generation(&self, job_id: &str) -> Result<(), EngineError>;

    /// Starts publication of a generated application.
    async fn create_publication(
        &self,
        application_key: &str,
    ) -> Result<CreatedPublication, EngineError>;

    /// Fetches the current publication snapshot.
    async fn publication_status(&self, publication_key: &str) -> Result<Publication, EngineError>;

    /// Fetches the deployed application's details.
    async fn application_details(
        &self,
        application_key: &str,
    ) -> Result<ApplicationDetails, EngineError>;
}

// ============================================================================
// HTTP Implementation
// ============================================================================

/// [`PlatformApi`] over the tenant's management API.
pub struct HttpPlatform {
    api: ApiClient,
    credentials: Arc<dyn CredentialSource>,
}

impl HttpPlatform {
    /// Creates a platform client from an API client and credential source.
    pub fn new(api: ApiClient, credentials: Arc<dyn CredentialSource>) -> Self {
        Self { api, credentials }
    }

    async fn token(&self) -> Result<String, EngineError> {
        Ok(self.credentials.bearer_token().await?)
    }
}

#[async_trait]
impl PlatformApi for HttpPlatform {
    async fn create_job(&self, prompt: &str) -> Result<CreatedJob, EngineError> {
        let token = self.token().await?;
        let request = CreateJobRequest {
            prompt: prompt.to_string(),
            files: Vec::new(),
            ignore_tenant_context: true,
        };
        Ok(self
            .api
            .post_json("/api/v1/jobs", &request, &token, MUTATION_TIMEOUT)
            .await?)
    }

    async fn job_status(&self, job_id: &str) -> Result<GenerationJob, EngineError> {
        let token = self.token().await?;
        Ok(self
            .api
            .get_json(&format!("/api/v1/jobs/{job_id}"), &token, STATUS_READ_TIMEOUT)
            .await?)
    }

    async fn trigger_generation(&self, job_id: &str) -> Result<(), EngineError> {
        let token = self.token().await?;
        Ok(self
            .api
            .post_empty(
                &format!("/api/v1/jobs/{job_id}/generate"),
                &token,
                MUTATION_TIMEOUT,
            )
            .await?)
    }

    async fn create_publication(
        &self,
        application_key: &str,
    ) -> Result<CreatedPublication, EngineError> {
        let token = self.token().await?;
        let request = CreatePublicationRequest {
            application_key: application_key.to_string(),
            application_revision: INITIAL_REVISION,
            download_url: None,
        };
        Ok(self
            .api
            .post_json("/api/v1/publications", &request, &token, MUTATION_TIMEOUT)
            .await?)
    }

    async fn publication_status(&self, publication_key: &str) -> Result<Publication, EngineError> {
        let token = self.token().await?;
        Ok(self
            .api
            .get_json(
                &format!("/api/v1/publications/{publication_key}"),
                &token,
                STATUS_READ_TIMEOUT,
            )
            .await?)
    }

    async fn application_details(
        &self,
        application_key: &str,
    ) -> Result<ApplicationDetails, EngineError> {
        let token = self.token().await?;
        Ok(self
            .api
            .get_json(
                &format!("/api/v1/applications/{application_key}"),
                &token,
                STATUS_READ_TIMEOUT,
            )
            .await?)
    }
}

// ============================================================================
// Tests
// ============================================================================
