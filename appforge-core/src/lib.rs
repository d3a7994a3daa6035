// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `AppForge` Core
//!
//! Core types, models, and traits for the `AppForge` client.
//!
//! This crate provides the foundational abstractions used across all other
//! `AppForge` crates, including:
//!
//! - Domain models (generation jobs, publications, application details)
//! - Error types
//! - Prompt validation
//! - Platform configuration
//! - Trait seams for credentials and time
//!
//! ## Key Types
//!
//! ### Remote Entities
//! - [`GenerationJob`] / [`JobStatus`] - a server-side app generation job
//! - [`Publication`] / [`PublicationStatus`] - a server-side deployment
//! - [`ApplicationDetails`] - the deployed application's metadata
//!
//! ### Orchestration
//! - [`OrchestrationEvent`] - tagged progress/result events for one run
//! - [`CorrelationId`] - per-run identifier threaded through logs and events
//!
//! ### Seams
//! - [`CredentialSource`] - "give me a valid bearer token"
//! - [`Clock`] - injectable time source for deterministic expiry tests

pub mod config;
pub mod correlation;
pub mod error;
pub mod models;
pub mod traits;
pub mod validate;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    AppSpec, ApplicationDetails, GenerationJob, JobStatus, OrchestrationEvent, Publication,
    PublicationStatus,
};

// Re-export configuration
pub use config::PlatformConfig;

// Re-export run identity
pub use correlation::CorrelationId;

// Re-export traits
pub use traits::{Clock, CredentialSource, SystemClock};

// Re-export validation
pub use validate::{validate_prompt, MAX_PROMPT_CHARS, MIN_PROMPT_CHARS};
