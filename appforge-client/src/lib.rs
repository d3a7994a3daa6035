// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `AppForge` Client
//!
//! Resilient outbound-call infrastructure for the `AppForge` client:
//!
//! - [`ApiClient`] - a deadline-enforced JSON request client that normalizes
//!   failures into typed [`ClientError`]s
//! - [`with_retry`] / [`RetryPolicy`] - exponential-backoff retry gated by
//!   error classification
//! - [`poll_with_backoff`] / [`PollPolicy`] - predicate-driven status polling
//!   with growing intervals and an observer hook
//!
//! Every suspension point in this crate (network calls, retry delays, poll
//! intervals) is a plain `await`, so dropping a returned future cancels the
//! pending work without leaking timers.

pub mod error;
pub mod http;
pub mod poll;
pub mod retry;

// Errors
pub use error::ClientError;

// HTTP client
pub use http::ApiClient;

// Retry engine
pub use retry::{with_retry, Retryable, RetryPolicy};

// Poll engine
pub use poll::{poll_with_backoff, PollError, PollPolicy};
