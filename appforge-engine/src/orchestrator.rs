//! The seven-stage job orchestrator.
//!
//! One run is strictly sequential: no stage begins before the previous
//! stage's success predicate is observed, and no two remote-state-changing
//! calls for the same run are ever in flight together. Runs are independent
//! of each other except for the shared token cache behind the credential
//! source.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, info_span, warn, Instrument};

use appforge_client::{poll_with_backoff, with_retry, PollError, PollPolicy, RetryPolicy};
use appforge_core::{
    validate_prompt, CorrelationId, CredentialSource, GenerationJob, JobStatus,
    OrchestrationEvent, PlatformConfig, Publication, PublicationStatus,
};

use crate::error::EngineError;
use crate::platform::PlatformApi;
use crate::sanitize::user_message;

/// Emit a polling progress update every N attempts, not every attempt.
const PROGRESS_EVERY: u32 = 5;

// ============================================================================
// Orchestrator
// ============================================================================

/// Sequences one prompt through generation and deployment.
pub struct Orchestrator {
    platform: Arc<dyn PlatformApi>,
    credentials: Arc<dyn CredentialSource>,
    config: Arc<PlatformConfig>,
    retry: RetryPolicy,
    ready_poll: PollPolicy,
    completion_poll: PollPolicy,
}

impl Orchestrator {
    /// Creates an orchestrator with the standard stage budgets.
    ///
    /// Readiness polls start at 2s capped at 10s over up to 60 attempts;
    /// generation and deployment polls start at 3s capped at 30s over up to
    /// 120 attempts, which bounds those stages at roughly one hour each in
    /// the worst case.
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        credentials: Arc<dyn CredentialSource>,
        config: Arc<PlatformConfig>,
    ) -> Self {
        Self {
            platform,
            credentials,
            config,
            retry: RetryPolicy::default(),
            ready_poll: PollPolicy::new(60, Duration::from_secs(2), Duration::from_secs(10)),
            completion_poll: PollPolicy::new(120, Duration::from_secs(3), Duration::from_secs(30)),
        }
    }

    /// Overrides the retry and poll budgets.
    pub fn with_policies(
        mut self,
        retry: RetryPolicy,
        ready_poll: PollPolicy,
        completion_poll: PollPolicy,
    ) -> Self {
        self.retry = retry;
        self.ready_poll = ready_poll;
        self.completion_poll = completion_poll;
        self
    }

    /// Runs the full create-and-deploy flow for one prompt.
    ///
    /// Progress events stream through `events`; the sequence ends with one
    /// `Completed(url)` or one sanitized `Failed(message)`. Dropping the
    /// receiver cancels the run: the orchestrator notices the closed channel
    /// at its next emission or poll and stops issuing network calls. The
    /// underlying error is returned as well; the event stream annotates
    /// failures, it does not swallow them.
    pub async fn create_and_deploy(
        &self,
        prompt: &str,
        events: mpsc::Sender<OrchestrationEvent>,
    ) -> Result<String, EngineError> {
        let correlation_id = CorrelationId::new();
        let span = info_span!("orchestration", correlation_id = %correlation_id);

        let result = self.run(prompt, &events).instrument(span.clone()).await;

        if let Err(error) = &result {
            span.in_scope(|| warn!(error = %error, "Orchestration failed"));
            if !matches!(error, EngineError::Cancelled) {
                let _ = events
                    .send(OrchestrationEvent::Failed(user_message(error)))
                    .await;
            }
        }

        result
    }

    /// Lightweight connectivity and credential check.
    ///
    /// Obtains a valid token without touching the job flow.
    pub async fn check_connection(&self) -> Result<String, EngineError> {
        self.credentials.bearer_token().await?;
        Ok(format!("Authenticated against {}", self.config.host))
    }

    // ========================================================================
    // Stages
    // ========================================================================

    async fn run(
        &self,
        prompt: &str,
        events: &mpsc::Sender<OrchestrationEvent>,
    ) -> Result<String, EngineError> {
        validate_prompt(prompt)?;

        // Stage 1: create the generation job.
        self.emit(events, "Submitting generation job").await?;
        let created = with_retry(&self.retry, || async move {
            self.ensure_live(events)?;
            self.platform.create_job(prompt).await
        })
        .await?;
        let job_id = created.job_id;
        info!(job_id = %job_id, "Generation job created");

        // Stage 2: wait until the job is ready to generate.
        self.emit(events, "Waiting for the job to become ready")
            .await?;
        self.poll_job(events, &job_id, JobStatus::ReadyToGenerate, "preparing")
            .await?;

        // Stage 3: trigger generation.
        self.emit(events, "Triggering generation").await?;
        with_retry(&self.retry, || {
            let job_id = job_id.as_str();
            async move {
                self.ensure_live(events)?;
                self.platform.trigger_generation(job_id).await
            }
        })
        .await?;

        // Stage 4: wait for generation to finish.
        self.emit(events, "Generating the application").await?;
        let job = self
            .poll_job(events, &job_id, JobStatus::Done, "generating")
            .await?;

        // Stage 4b: the finished job must carry the application key.
        let application_key = job
            .application_key()
            .ok_or(EngineError::MissingField {
                entity: "generation job",
                field: "appSpec.appKey",
            })?
            .to_string();
        info!(application_key = %application_key, "Generation finished");

        // Stage 5: start publication.
        self.emit(events, "Publishing the application").await?;
        let publication = with_retry(&self.retry, || {
            let application_key = application_key.clone();
            async move {
                self.ensure_live(events)?;
                self.platform.create_publication(&application_key).await
            }
        })
        .await?;
        info!(publication_key = %publication.publication_key, "Publication started");

        // Stage 6: wait for deployment to finish.
        self.emit(events, "Deploying the application").await?;
        self.poll_publication(events, &publication.publication_key)
            .await?;

        // Stage 7: resolve the live URL.
        let details = {
            self.ensure_live(events)?;
            self.platform.application_details(&application_key).await?
        };
        let url_path = details.url_path().ok_or(EngineError::MissingField {
            entity: "application details",
            field: "urlPath",
        })?;

        let url = self.live_url(url_path);
        info!(url = %url, "Orchestration complete");

        // The work is done even if the consumer left; ignore a closed channel.
        let _ = events.send(OrchestrationEvent::Completed(url.clone())).await;
        Ok(url)
    }

    async fn poll_job(
        &self,
        events: &mpsc::Sender<OrchestrationEvent>,
        job_id: &str,
        target: JobStatus,
        phase: &str,
    ) -> Result<GenerationJob, EngineError> {
        let policy = if target == JobStatus::ReadyToGenerate {
            &self.ready_poll
        } else {
            &self.completion_poll
        };

        poll_with_backoff(
            policy,
            || async move {
                self.ensure_live(events)?;
                self.platform.job_status(job_id).await
            },
            |job: &GenerationJob| job.status == target,
            |job| job.status == JobStatus::Failed,
            |job, attempt| {
                if job.status == JobStatus::Unknown {
                    warn!(job_id, "Job reported an unrecognized status, continuing to poll");
                }
                if attempt > 0 && attempt % PROGRESS_EVERY == 0 {
                    let _ = events.try_send(OrchestrationEvent::Progress(format!(
                        "Still {phase} (status: {})",
                        job.status
                    )));
                }
            },
        )
        .await
        .map_err(|error| match error {
            PollError::TimedOut { attempts } => EngineError::PollTimeout { attempts },
            PollError::Failed(job) => EngineError::RemoteFailure {
                entity: "generation job",
                status: job.status.label(),
            },
            PollError::Op(inner) => inner,
        })
    }

    async fn poll_publication(
        &self,
        events: &mpsc::Sender<OrchestrationEvent>,
        publication_key: &str,
    ) -> Result<Publication, EngineError> {
        poll_with_backoff(
            &self.completion_poll,
            || async move {
                self.ensure_live(events)?;
                self.platform.publication_status(publication_key).await
            },
            |publication: &Publication| publication.status == PublicationStatus::Finished,
            |publication| publication.status == PublicationStatus::Failed,
            |publication, attempt| {
                if publication.status == PublicationStatus::Unknown {
                    warn!(
                        publication_key,
                        "Publication reported an unrecognized status, continuing to poll"
                    );
                }
                if attempt > 0 && attempt % PROGRESS_EVERY == 0 {
                    let _ = events.try_send(OrchestrationEvent::Progress(format!(
                        "Still deploying (status: {})",
                        publication.status
                    )));
                }
            },
        )
        .await
        .map_err(|error| match error {
            PollError::TimedOut { attempts } => EngineError::PollTimeout { attempts },
            PollError::Failed(publication) => EngineError::RemoteFailure {
                entity: "publication",
                status: publication.status.label(),
            },
            PollError::Op(inner) => inner,
        })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn emit(
        &self,
        events: &mpsc::Sender<OrchestrationEvent>,
        text: &str,
    ) -> Result<(), EngineError> {
        events
            .send(OrchestrationEvent::Progress(text.to_string()))
            .await
            .map_err(|_| EngineError::Cancelled)
    }

    fn ensure_live(&self, events: &mpsc::Sender<OrchestrationEvent>) -> Result<(), EngineError> {
        if events.is_closed() {
            return Err(EngineError::Cancelled);
        }
        Ok(())
    }

    fn live_url(&self, url_path: &str) -> String {
        let path = if url_path.starts_with('/') {
            url_path.to_string()
        } else {
            format!("/{url_path}")
        };
        format!("https://{}{path}", self.config.live_app_host())
    }
}
