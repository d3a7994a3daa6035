//! Cookie-carrying HTTP session for the authentication exchange.

use reqwest::{redirect, Client};
use std::time::Duration;

use crate::error::AuthError;

/// Per-exchange request timeout.
const EXCHANGE_TIMEOUT_SECS: u64 = 30;

/// User agent string for AppForge.
const USER_AGENT: &str = concat!("appforge/", env!("CARGO_PKG_VERSION"));

/// HTTP session shared by every hop of one authentication exchange.
///
/// The identity provider correlates the exchange's steps through server-side
/// session cookies set during authorization initiation and consumed by the
/// later code exchanges, so all hops must go through one cookie jar. The
/// session never follows redirects: the exchange inspects `Location` headers
/// instead.
///
/// A session is built fresh for each exchange and dropped with it; cookie
/// state never outlives the exchange that created it.
pub struct AuthSession {
    client: Client,
}

impl AuthSession {
    /// Creates a new session with an empty cookie jar.
    pub fn new() -> Result<Self, AuthError> {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(EXCHANGE_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}
