//! Trait definitions for AppForge.
//!
//! These traits are the seams between the orchestration core and its
//! collaborators: where tokens come from and what time it is. Both are
//! injectable so tests can substitute deterministic implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreError;

/// Source of valid bearer tokens for the platform API.
///
/// Implementors are responsible for caching and refreshing; callers treat
/// every returned token as valid for immediate use. A failed refresh
/// surfaces as [`CoreError::AuthenticationFailed`] with no further detail.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Returns a bearer token valid for immediate use.
    async fn bearer_token(&self) -> Result<String, CoreError>;
}

/// Injectable time source.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
