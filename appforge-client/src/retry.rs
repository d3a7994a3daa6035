//! Retry engine with exponential backoff.
//!
//! [`with_retry`] re-issues a failed operation until it succeeds, the error
//! classifies as non-retryable, or the attempt budget is exhausted. The last
//! observed error is re-raised unchanged.

use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::error::ClientError;

// ============================================================================
// Retry Policy
// ============================================================================

/// Attempt budget and delay schedule for retried operations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and a 1s initial delay.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::from_millis(1000),
        }
    }

    /// Sets the initial delay.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Delay before retry `attempt` (0-indexed): `initial * 2^attempt`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.initial_delay * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

// ============================================================================
// Error Classification
// ============================================================================

/// Classifies errors as retryable and exposes server-directed delays.
pub trait Retryable {
    /// Returns true if the failed operation may be re-issued.
    fn is_retryable(&self) -> bool;

    /// Server-directed delay overriding the computed backoff, if any.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl Retryable for ClientError {
    fn is_retryable(&self) -> bool {
        match self {
            // Client errors are the caller's fault and will not heal on
            // retry; 429 is carved out as RateLimited below.
            Self::Api { status, .. } => !(400..500).contains(status),
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Http(_) => true,
            Self::Json(_) => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited {
                retry_after: Some(secs),
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

// ============================================================================
// Retry Loop
// ============================================================================

/// Runs `op`, retrying retryable failures with exponential backoff.
///
/// Makes at most `policy.max_attempts` attempts. A non-retryable error is
/// re-raised after exactly one attempt. Shares no state with the caller
/// besides per-attempt debug logs.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                attempt += 1;
                if !error.is_retryable() || attempt >= policy.max_attempts {
                    return Err(error);
                }

                let delay = error
                    .retry_after()
                    .unwrap_or_else(|| policy.delay_for_attempt(attempt - 1));

                debug!(
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %error,
                    "Retrying after failure"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
