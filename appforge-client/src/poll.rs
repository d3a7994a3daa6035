//! Poll engine with growing backoff.
//!
//! [`poll_with_backoff`] repeatedly issues a status check until a success or
//! failure predicate fires or the attempt budget runs out. The engine knows
//! nothing about message formats: an observer callback sees every snapshot
//! and attempt index, so callers decide what (if anything) to surface.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Poll Policy
// ============================================================================

/// Attempt budget and interval schedule for one polling loop.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Maximum number of `poll()` calls.
    pub max_attempts: u32,
    /// Interval after the first poll.
    pub initial_interval: Duration,
    /// Upper bound on the interval.
    pub max_interval: Duration,
}

impl PollPolicy {
    /// Creates a policy.
    pub fn new(max_attempts: u32, initial_interval: Duration, max_interval: Duration) -> Self {
        Self {
            max_attempts,
            initial_interval,
            max_interval,
        }
    }

    /// Interval after attempt `attempt` (0-indexed):
    /// `min(initial * 1.5^attempt, max_interval)`.
    pub fn interval_for_attempt(&self, attempt: u32) -> Duration {
        let grown = self.initial_interval.as_secs_f64() * 1.5f64.powi(attempt.min(1024) as i32);
        Duration::from_secs_f64(grown.min(self.max_interval.as_secs_f64()))
    }
}

// ============================================================================
// Poll Error
// ============================================================================

/// Error type for [`poll_with_backoff`].
#[derive(Debug, Error)]
pub enum PollError<T, E>
where
    T: fmt::Debug,
    E: std::error::Error,
{
    /// The attempt budget ran out without a terminal snapshot.
    #[error("Poll budget exhausted after {attempts} attempts")]
    TimedOut {
        /// Number of polls issued.
        attempts: u32,
    },

    /// The failure predicate fired; the failing snapshot is embedded.
    #[error("Polled resource reached a failure state")]
    Failed(T),

    /// The poll operation itself failed.
    #[error(transparent)]
    Op(E),
}

// ============================================================================
// Poll Loop
// ============================================================================

/// Polls until `is_success` or `is_failure` fires, or the budget runs out.
///
/// Success is checked before failure on every iteration, so a snapshot
/// satisfying both predicates counts as success. `observer` is invoked once
/// per poll with the raw snapshot and the 0-indexed attempt.
///
/// The loop is cooperatively cancellable: dropping the returned future stops
/// further polls and releases the pending interval timer. No sleep follows
/// the final attempt.
pub async fn poll_with_backoff<T, E, F, Fut, S, P, O>(
    policy: &PollPolicy,
    mut poll: F,
    is_success: S,
    is_failure: P,
    mut observer: O,
) -> Result<T, PollError<T, E>>
where
    T: fmt::Debug,
    E: std::error::Error,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    S: Fn(&T) -> bool,
    P: Fn(&T) -> bool,
    O: FnMut(&T, u32),
{
    for attempt in 0..policy.max_attempts {
        let snapshot = poll().await.map_err(PollError::Op)?;
        observer(&snapshot, attempt);

        if is_success(&snapshot) {
            return Ok(snapshot);
        }
        if is_failure(&snapshot) {
            return Err(PollError::Failed(snapshot));
        }

        if attempt + 1 < policy.max_attempts {
            tokio::time::sleep(policy.interval_for_attempt(attempt)).await;
        }
    }

    Err(PollError::TimedOut {
        attempts: policy.max_attempts,
    })
}

// ============================================================================
// Tests
// ============================================================================
