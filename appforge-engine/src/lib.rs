// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `AppForge` Engine
//!
//! The job orchestration engine: everything between "here is a prompt" and
//! "here is the URL of your deployed application".
//!
//! The [`Orchestrator`] sequences seven stages (create job, wait for
//! readiness, trigger generation, wait for completion, publish, wait for
//! deployment, resolve the live URL) through the [`PlatformApi`] seam.
//! Mutating calls are wrapped in the retry engine; status polls run through
//! the poll engine with stage-specific budgets. Progress surfaces as a lazy
//! sequence of [`OrchestrationEvent`](appforge_core::OrchestrationEvent)s on
//! a channel; dropping the receiver cancels the run.
//!
//! Failures reaching the consumer are sanitized through [`user_message`];
//! raw status codes, response bodies, and internal URLs stay in the logs.

pub mod error;
pub mod orchestrator;
pub mod platform;
pub mod sanitize;

// Errors
pub use error::EngineError;

// Orchestrator
pub use orchestrator::Orchestrator;

// Platform seam
pub use platform::{
    CreateJobRequest, CreatePublicationRequest, CreatedJob, CreatedPublication, HttpPlatform,
    PlatformApi,
};

// Sanitization
pub use sanitize::user_message;
