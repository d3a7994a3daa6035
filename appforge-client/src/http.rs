//! Deadline-enforced JSON request client.
//!
//! [`ApiClient`] wraps a single outbound call: it enforces a per-call
//! deadline, attaches the bearer token, and normalizes every failure mode
//! into a typed [`ClientError`]. Failed requests are logged with status,
//! endpoint, and method only; request and response bodies never appear in
//! log output.

use reqwest::{header, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::ClientError;

/// User agent string for AppForge.
const USER_AGENT: &str = concat!("appforge/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// API Client
// ============================================================================

/// JSON request client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    ///
    /// The per-call deadline is supplied per request rather than on the
    /// client, since status reads and mutating calls carry different
    /// deadlines.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let inner = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            inner,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issues one request and normalizes the outcome.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: Option<serde_json::Value>,
        timeout: Duration,
    ) -> Result<Response, ClientError> {
        let mut request = self
            .inner
            .request(method.clone(), self.url(path))
            .bearer_auth(token)
            .timeout(timeout);

        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(timeout)
            } else {
                ClientError::Http(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), endpoint = path, "Response received");
            return Ok(response);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());

            warn!(
                status = status.as_u16(),
                endpoint = path,
                method = %method,
                "Request rate limited"
            );
            return Err(ClientError::RateLimited { retry_after });
        }

        warn!(
            status = status.as_u16(),
            endpoint = path,
            method = %method,
            "Request failed"
        );

        // The body is captured for the error value only, never logged.
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Performs a GET request and parses the JSON response.
    #[instrument(skip(self, token))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<T, ClientError> {
        let response = self.execute(Method::GET, path, token, None, timeout).await?;
        Ok(response.json::<T>().await?)
    }

    /// Performs a POST request with a JSON body and parses the JSON response.
    #[instrument(skip(self, body, token))]
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: &str,
        timeout: Duration,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        let response = self
            .execute(Method::POST, path, token, Some(body), timeout)
            .await?;
        Ok(response.json::<T>().await?)
    }

    /// Performs a POST request whose success response carries no body.
    #[instrument(skip(self, token))]
    pub async fn post_empty(
        &self,
        path: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        self.execute(Method::POST, path, token, None, timeout)
            .await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
