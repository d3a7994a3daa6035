//! The authentication exchange state machine.
//!
//! States run in strict order with no branching besides failure exits:
//! discovery → PKCE → authorization initiation → pool configuration →
//! federated SRP login → token-for-code exchange → code-via-redirect
//! exchange → access token. Any step failure aborts the whole exchange; no
//! step is retried individually. A failed exchange is rerun from the top on
//! the next token request.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

use appforge_core::PlatformConfig;

use crate::error::AuthError;
use crate::federation;
use crate::oidc;
use crate::pkce::PkcePair;
use crate::session::AuthSession;

// ============================================================================
// Issued Token
// ============================================================================

/// Result of one successful exchange.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The platform bearer token.
    pub access_token: String,
    /// Lifetime in seconds, from the token endpoint or the configured
    /// fallback.
    pub expires_in: u64,
}

// ============================================================================
// Authenticator Seam
// ============================================================================

/// Something that can produce a fresh bearer token.
///
/// The token cache depends on this trait rather than on [`AuthExchange`]
/// directly so tests can count and fake exchanges.
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    /// Runs one full authentication, returning a fresh token.
    async fn authenticate(&self) -> Result<IssuedToken, AuthError>;
}

// ============================================================================
// Auth Exchange
// ============================================================================

/// Runs the federated authentication exchange against the configured tenant.
pub struct AuthExchange {
    config: Arc<PlatformConfig>,
}

impl AuthExchange {
    /// Creates an exchange for the given configuration.
    pub fn new(config: Arc<PlatformConfig>) -> Self {
        Self { config }
    }

    fn redirect_uri(&self) -> String {
        format!(
            "{}/oauth/done",
            self.config.identity_base.trim_end_matches('/')
        )
    }

    /// Executes the full exchange with a fresh cookie session.
    #[instrument(skip(self), fields(username = %self.config.username))]
    pub async fn acquire_token(&self) -> Result<IssuedToken, AuthError> {
        let session = AuthSession::new()?;
        let identity_base = self.config.identity_base.trim_end_matches('/');
        let redirect_uri = self.redirect_uri();

        debug!("Starting federated authentication exchange");

        let oidc = oidc::discover(&session, identity_base).await?;
        let pkce = PkcePair::generate()?;
        let authorization =
            federation::initiate_authorization(&session, &oidc, &redirect_uri, &pkce).await?;
        let pool = federation::fetch_pool_config(
            &session,
            &authorization.federation_base,
            &authorization.client_id,
        )
        .await?;
        let tokens = federation::federated_login(
            &session,
            &pool,
            &authorization.client_id,
            &self.config.username,
            &self.config.password,
        )
        .await?;
        let code = federation::exchange_for_auth_code(
            &session,
            identity_base,
            &tokens,
            &pool,
            &authorization.client_id,
        )
        .await?;
        let final_code = federation::exchange_code_via_redirect(
            &session,
            &authorization.callback_uri,
            &code,
            &authorization.state,
        )
        .await?;
        let token = federation::exchange_for_access_token(
            &session,
            &oidc.token_endpoint,
            &final_code,
            &pkce,
            &redirect_uri,
        )
        .await?;

        let expires_in = token
            .expires_in
            .unwrap_or(self.config.token_expiry_fallback_secs);
        debug!(expires_in, "Authentication exchange complete");

        Ok(IssuedToken {
            access_token: token.access_token,
            expires_in,
        })
    }
}

#[async_trait]
impl TokenAuthenticator for AuthExchange {
    async fn authenticate(&self) -> Result<IssuedToken, AuthError> {
        self.acquire_token().await
    }
}
