//! End-to-end orchestration tests against a scripted platform.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use appforge_client::ClientError;
use appforge_core::{
    AppSpec, ApplicationDetails, CoreError, CredentialSource, GenerationJob, JobStatus,
    OrchestrationEvent, PlatformConfig, Publication, PublicationStatus,
};
use appforge_engine::platform::{CreatedJob, CreatedPublication};
use appforge_engine::{EngineError, Orchestrator, PlatformApi};

// ============================================================================
// Test Doubles
// ============================================================================

struct StaticCredentials;

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn bearer_token(&self) -> Result<String, CoreError> {
        Ok("bearer-1".to_string())
    }
}

/// Platform double that replays scripted status sequences.
///
/// Each status queue is consumed one entry per poll; the final entry repeats
/// if polled again.
struct ScriptedPlatform {
    job_statuses: Mutex<VecDeque<JobStatus>>,
    publication_statuses: Mutex<VecDeque<PublicationStatus>>,
    app_key: Option<String>,
    url_path: Option<String>,
    create_failures: AtomicU32,
    create_calls: AtomicU32,
}

impl ScriptedPlatform {
    fn new(jobs: Vec<JobStatus>, publications: Vec<PublicationStatus>) -> Self {
        Self {
            job_statuses: Mutex::new(jobs.into()),
            publication_statuses: Mutex::new(publications.into()),
            app_key: Some("app-456".to_string()),
            url_path: Some("/p/todo-tracker".to_string()),
            create_failures: AtomicU32::new(0),
            create_calls: AtomicU32::new(0),
        }
    }

    fn without_app_key(mut self) -> Self {
        self.app_key = None;
        self
    }

    fn failing_creates(self, failures: u32) -> Self {
        self.create_failures.store(failures, Ordering::SeqCst);
        self
    }

    fn create_calls(&self) -> u32 {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn next_from<T: Copy>(queue: &Mutex<VecDeque<T>>) -> T {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            *queue.front().expect("status script exhausted")
        }
    }
}

#[async_trait]
impl PlatformApi for ScriptedPlatform {
    async fn create_job(&self, _prompt: &str) -> Result<CreatedJob, EngineError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.create_failures.load(Ordering::SeqCst) > 0 {
            self.create_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(EngineError::Client(ClientError::Api {
                status: 503,
                body: String::new(),
            }));
        }
        Ok(CreatedJob {
            job_id: "job-1".to_string(),
        })
    }

    async fn job_status(&self, job_id: &str) -> Result<GenerationJob, EngineError> {
        let status = Self::next_from(&self.job_statuses);
        Ok(GenerationJob {
            job_id: job_id.to_string(),
            status,
            app_spec: (status == JobStatus::Done)
                .then(|| self.app_key.clone().map(|app_key| AppSpec { app_key }))
                .flatten(),
        })
    }

    async fn trigger_generation(&self, _job_id: &str) -> Result<(), EngineError> {
        Ok(())
    }

    async fn create_publication(
        &self,
        application_key: &str,
    ) -> Result<CreatedPublication, EngineError> {
        assert_eq!(application_key, "app-456");
        Ok(CreatedPublication {
            publication_key: "pub-1".to_string(),
        })
    }

    async fn publication_status(&self, publication_key: &str) -> Result<Publication, EngineError> {
        Ok(Publication {
            publication_key: publication_key.to_string(),
            status: Self::next_from(&self.publication_statuses),
            application_key: self.app_key.clone(),
            application_revision: Some(1),
        })
    }

    async fn application_details(
        &self,
        application_key: &str,
    ) -> Result<ApplicationDetails, EngineError> {
        Ok(ApplicationDetails {
            app_key: application_key.to_string(),
            name: Some("Todo Tracker".to_string()),
            url_path: self.url_path.clone(),
        })
    }
}

// ============================================================================
// Harness
// ============================================================================

const PROMPT: &str = "a todo tracker with due dates";

fn config() -> Arc<PlatformConfig> {
    Arc::new(PlatformConfig {
        host: "acme.appforge.dev".to_string(),
        username: "dev@acme.test".to_string(),
        password: "hunter2".to_string(),
        ..Default::default()
    })
}

fn orchestrator_for(platform: Arc<ScriptedPlatform>) -> Orchestrator {
    Orchestrator::new(platform, Arc::new(StaticCredentials), config())
}

async fn run_collecting(
    orchestrator: &Orchestrator,
    prompt: &str,
) -> (Result<String, EngineError>, Vec<OrchestrationEvent>) {
    let (tx, mut rx) = mpsc::channel(64);
    let run = orchestrator.create_and_deploy(prompt, tx);
    let collect = async move {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    };
    tokio::join!(run, collect)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn round_trip_terminates_with_live_url() {
    let platform = Arc::new(ScriptedPlatform::new(
        vec![
            JobStatus::Pending,
            JobStatus::ReadyToGenerate,
            JobStatus::Generating,
            JobStatus::Generating,
            JobStatus::Done,
        ],
        vec![
            PublicationStatus::Queued,
            PublicationStatus::Running,
            PublicationStatus::Finished,
        ],
    ));
    let orchestrator = orchestrator_for(platform);

    let (result, events) = run_collecting(&orchestrator, PROMPT).await;

    let url = result.unwrap();
    assert_eq!(url, "https://acme.forgeapps.dev/p/todo-tracker");

    let last = events.last().unwrap();
    assert_eq!(last, &OrchestrationEvent::Completed(url));
    assert!(events
        .iter()
        .any(|e| matches!(e, OrchestrationEvent::Progress(text) if text == "Submitting generation job")));
    assert!(events
        .iter()
        .all(|e| !matches!(e, OrchestrationEvent::Failed(_))));
}

#[tokio::test(start_paused = true)]
async fn job_failing_on_first_poll_raises_remote_failure() {
    let platform = Arc::new(ScriptedPlatform::new(
        vec![JobStatus::Failed],
        vec![PublicationStatus::Finished],
    ));
    let orchestrator = orchestrator_for(platform);

    let (result, events) = run_collecting(&orchestrator, PROMPT).await;

    assert!(matches!(
        result,
        Err(EngineError::RemoteFailure {
            entity: "generation job",
            ..
        })
    ));

    let failures: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, OrchestrationEvent::Failed(_)))
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].text(), "an error occurred, try again");
    assert!(events
        .iter()
        .all(|e| !matches!(e, OrchestrationEvent::Completed(_))));
}

#[tokio::test(start_paused = true)]
async fn short_prompt_rejected_before_any_network_call() {
    let platform = Arc::new(ScriptedPlatform::new(
        vec![JobStatus::ReadyToGenerate],
        vec![PublicationStatus::Finished],
    ));
    let orchestrator = orchestrator_for(platform.clone());

    let (result, _events) = run_collecting(&orchestrator, "short").await;

    assert!(matches!(
        result,
        Err(EngineError::Core(CoreError::InvalidPrompt(_)))
    ));
    assert_eq!(platform.create_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn prompt_length_boundaries() {
    let platform = Arc::new(ScriptedPlatform::new(
        vec![JobStatus::ReadyToGenerate, JobStatus::Done],
        vec![PublicationStatus::Finished],
    ));
    let orchestrator = orchestrator_for(platform.clone());

    // Exactly 500 characters is accepted and runs to completion.
    let (result, _) = run_collecting(&orchestrator, &"x".repeat(500)).await;
    assert!(result.is_ok());

    // 501 characters is rejected without touching the platform.
    let calls_before = platform.create_calls();
    let (result, _) = run_collecting(&orchestrator, &"x".repeat(501)).await;
    assert!(matches!(
        result,
        Err(EngineError::Core(CoreError::InvalidPrompt(_)))
    ));
    assert_eq!(platform.create_calls(), calls_before);
}

#[tokio::test(start_paused = true)]
async fn job_creation_retries_transient_failures() {
    let platform = Arc::new(
        ScriptedPlatform::new(
            vec![JobStatus::ReadyToGenerate, JobStatus::Done],
            vec![PublicationStatus::Finished],
        )
        .failing_creates(2),
    );
    let orchestrator = orchestrator_for(platform.clone());

    let (result, _) = run_collecting(&orchestrator, PROMPT).await;

    assert!(result.is_ok());
    // Two 503s, then success on the third attempt.
    assert_eq!(platform.create_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn completed_job_without_app_key_is_fatal() {
    let platform = Arc::new(
        ScriptedPlatform::new(
            vec![JobStatus::ReadyToGenerate, JobStatus::Done],
            vec![PublicationStatus::Finished],
        )
        .without_app_key(),
    );
    let orchestrator = orchestrator_for(platform);

    let (result, _) = run_collecting(&orchestrator, PROMPT).await;

    assert!(matches!(
        result,
        Err(EngineError::MissingField {
            entity: "generation job",
            field: "appSpec.appKey",
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn publication_failure_raises_remote_failure() {
    let platform = Arc::new(ScriptedPlatform::new(
        vec![JobStatus::ReadyToGenerate, JobStatus::Done],
        vec![PublicationStatus::Queued, PublicationStatus::Failed],
    ));
    let orchestrator = orchestrator_for(platform);

    let (result, _) = run_collecting(&orchestrator, PROMPT).await;

    assert!(matches!(
        result,
        Err(EngineError::RemoteFailure {
            entity: "publication",
            status: "failed",
        })
    ));
}

#[tokio::test]
async fn dropped_receiver_cancels_before_network_calls() {
    let platform = Arc::new(ScriptedPlatform::new(
        vec![JobStatus::ReadyToGenerate],
        vec![PublicationStatus::Finished],
    ));
    let orchestrator = orchestrator_for(platform.clone());

    let (tx, rx) = mpsc::channel(64);
    drop(rx);

    let result = orchestrator.create_and_deploy(PROMPT, tx).await;

    assert!(matches!(result, Err(EngineError::Cancelled)));
    assert_eq!(platform.create_calls(), 0);
}

#[tokio::test]
async fn check_connection_reports_tenant() {
    let platform = Arc::new(ScriptedPlatform::new(
        vec![JobStatus::ReadyToGenerate],
        vec![PublicationStatus::Finished],
    ));
    let orchestrator = orchestrator_for(platform);

    let message = orchestrator.check_connection().await.unwrap();
    assert!(message.contains("acme.appforge.dev"));
}
