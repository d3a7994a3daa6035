// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `AppForge` Auth
//!
//! Federated authentication for the `AppForge` platform.
//!
//! Obtaining a bearer token requires a seven-step exchange across two
//! identity systems: OIDC discovery, PKCE generation, an authorization
//! request whose redirect is inspected rather than followed, a federated
//! SRP login against an identity pool, and a pair of code exchanges that
//! convert the federated tokens into the platform's access token. Every hop
//! shares one cookie jar ([`AuthSession`]) because the identity provider
//! correlates the steps through server-side session cookies.
//!
//! ## Key Types
//!
//! - [`AuthExchange`] - runs the full exchange, start to finish
//! - [`TokenCache`] - single-slot cache with an early-refresh buffer
//! - [`PkcePair`] - code verifier/challenge pair
//! - [`SrpClient`] - SRP-6a client-side math
//!
//! Callers outside this crate only ever see
//! [`CoreError::AuthenticationFailed`](appforge_core::CoreError); the
//! internal [`AuthError`] detail is logged, never surfaced.

pub mod error;
pub mod exchange;
pub mod federation;
pub mod oidc;
pub mod pkce;
pub mod session;
pub mod srp;
pub mod token_cache;

// Errors
pub use error::AuthError;

// Exchange
pub use exchange::{AuthExchange, IssuedToken, TokenAuthenticator};

// Session
pub use session::AuthSession;

// PKCE & SRP
pub use pkce::PkcePair;
pub use srp::SrpClient;

// Token cache
pub use token_cache::TokenCache;
