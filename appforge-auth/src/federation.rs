//! Individual hops of the federated authentication exchange.
//!
//! Each function here is one state of the exchange; [`crate::exchange`]
//! sequences them. All hops share the caller's [`AuthSession`] so cookie
//! state accumulates across the chain.

use chrono::Utc;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::AuthError;
use crate::oidc::OidcConfiguration;
use crate::pkce::PkcePair;
use crate::session::AuthSession;
use crate::srp::{srp_timestamp, SrpClient};

/// Fixed public OAuth client id of this tool.
pub const PUBLIC_CLIENT_ID: &str = "appforge-cli";

/// Federation hint steering the authorization endpoint to the identity pool.
const FEDERATION_HINT: &str = "federated-pool";

// ============================================================================
// Authorization Initiation
// ============================================================================

/// Parameters extracted from the authorization endpoint's redirect.
#[derive(Debug, Clone)]
pub struct AuthorizationRedirect {
    /// Scheme and authority of the federation host.
    pub federation_base: String,
    /// Federation client id.
    pub client_id: String,
    /// Identity-provider URI that later receives the intermediate code.
    pub callback_uri: String,
    /// Opaque state echoed through the code exchanges.
    pub state: String,
}

/// Issues the authorization request and inspects the redirect instead of
/// following it.
///
/// The redirect target carries everything the federated login needs: the
/// federation host, its client id, the callback URI for the intermediate
/// code, and the `state` value. Any of them missing is fatal.
pub async fn initiate_authorization(
    session: &AuthSession,
    oidc: &OidcConfiguration,
    redirect_uri: &str,
    pkce: &PkcePair,
) -> Result<AuthorizationRedirect, AuthError> {
    debug!("Initiating authorization request");

    let response = session
        .client()
        .get(&oidc.authorization_endpoint)
        .query(&[
            ("response_type", "code"),
            ("client_id", PUBLIC_CLIENT_ID),
            ("redirect_uri", redirect_uri),
            ("scope", "openid profile"),
            ("code_challenge", &pkce.challenge),
            ("code_challenge_method", "S256"),
            ("idp_hint", FEDERATION_HINT),
        ])
        .send()
        .await?;

    let location = redirect_location(&response).ok_or_else(|| {
        AuthError::Authorization(format!(
            "authorization endpoint answered HTTP {} without a redirect",
            response.status().as_u16()
        ))
    })?;

    let url = Url::parse(&location)
        .map_err(|e| AuthError::Authorization(format!("unparseable redirect target: {e}")))?;

    let mut state = None;
    let mut callback_uri = None;
    let mut client_id = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "state" => state = Some(value.into_owned()),
            "redirect_uri" => callback_uri = Some(value.into_owned()),
            "client_id" => client_id = Some(value.into_owned()),
            _ => {}
        }
    }

    let host = url
        .host_str()
        .ok_or_else(|| AuthError::Authorization("redirect target has no host".to_string()))?;
    let mut federation_base = format!("{}://{host}", url.scheme());
    if let Some(port) = url.port() {
        federation_base.push_str(&format!(":{port}"));
    }

    Ok(AuthorizationRedirect {
        federation_base,
        client_id: client_id
            .ok_or_else(|| AuthError::Authorization("redirect missing client id".to_string()))?,
        callback_uri: callback_uri
            .ok_or_else(|| AuthError::Authorization("redirect missing callback URI".to_string()))?,
        state: state
            .ok_or_else(|| AuthError::Authorization("redirect missing state".to_string()))?,
    })
}

// ============================================================================
// Pool Configuration
// ============================================================================

/// Configuration of the federated identity pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolConfig {
    /// Identity pool identifier.
    pub pool_id: String,
    /// Base URL of the pool's authentication endpoints.
    pub endpoint: String,
}

/// Fetches the pool configuration document from the federation host.
pub async fn fetch_pool_config(
    session: &AuthSession,
    federation_base: &str,
    client_id: &str,
) -> Result<PoolConfig, AuthError> {
    let url = format!("{federation_base}/.well-known/pool-config");
    debug!(url = %url, "Fetching identity pool configuration");

    let response = session
        .client()
        .get(&url)
        .query(&[("client_id", client_id)])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AuthError::PoolConfig(format!(
            "HTTP {}",
            response.status().as_u16()
        )));
    }

    Ok(response.json::<PoolConfig>().await?)
}

// ============================================================================
// Federated Login (SRP)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitiateLoginRequest<'a> {
    username: &'a str,
    pool_id: &'a str,
    client_id: &'a str,
    srp_a: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginChallenge {
    salt: String,
    srp_b: String,
    secret_block: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyLoginRequest<'a> {
    username: &'a str,
    pool_id: &'a str,
    client_id: &'a str,
    timestamp: &'a str,
    secret_block: &'a str,
    password_signature: &'a str,
}

/// Tokens issued by the federated pool on a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedTokens {
    /// Identity token of the federated identity.
    pub id_token: String,
    /// Access token of the federated identity.
    pub access_token: String,
    /// Refresh token of the federated identity.
    pub refresh_token: String,
}

/// Runs the SRP challenge–response against the federated pool.
pub async fn federated_login(
    session: &AuthSession,
    pool: &PoolConfig,
    client_id: &str,
    username: &str,
    password: &str,
) -> Result<FederatedTokens, AuthError> {
    let srp = SrpClient::new()?;
    let endpoint = pool.endpoint.trim_end_matches('/');

    debug!(pool_id = %pool.pool_id, "Initiating federated SRP login");

    let response = session
        .client()
        .post(format!("{endpoint}/auth/initiate"))
        .json(&InitiateLoginRequest {
            username,
            pool_id: &pool.pool_id,
            client_id,
            srp_a: srp.public_a_hex(),
        })
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AuthError::FederatedLogin(format!(
            "challenge request: HTTP {}",
            response.status().as_u16()
        )));
    }
    let challenge: LoginChallenge = response.json().await?;

    let timestamp = srp_timestamp(Utc::now());
    let signature = srp.password_claim(
        &pool.pool_id,
        username,
        password,
        &challenge.salt,
        &challenge.srp_b,
        &challenge.secret_block,
        &timestamp,
    )?;

    let response = session
        .client()
        .post(format!("{endpoint}/auth/respond"))
        .json(&VerifyLoginRequest {
            username,
            pool_id: &pool.pool_id,
            client_id,
            timestamp: &timestamp,
            secret_block: &challenge.secret_block,
            password_signature: &signature,
        })
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AuthError::FederatedLogin(format!(
            "verification: HTTP {}",
            response.status().as_u16()
        )));
    }

    Ok(response.json::<FederatedTokens>().await?)
}

// ============================================================================
// Code Exchanges
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenExchangeRequest<'a> {
    id_token: &'a str,
    access_token: &'a str,
    refresh_token: &'a str,
    pool_id: &'a str,
    client_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    code: String,
}

/// Exchanges the federated tokens for an intermediate authorization code.
pub async fn exchange_for_auth_code(
    session: &AuthSession,
    identity_base: &str,
    tokens: &FederatedTokens,
    pool: &PoolConfig,
    client_id: &str,
) -> Result<String, AuthError> {
    let url = format!(
        "{}/federation/token-exchange",
        identity_base.trim_end_matches('/')
    );
    debug!("Exchanging federated tokens for authorization code");

    let response = session
        .client()
        .post(&url)
        .json(&TokenExchangeRequest {
            id_token: &tokens.id_token,
            access_token: &tokens.access_token,
            refresh_token: &tokens.refresh_token,
            pool_id: &pool.pool_id,
            client_id,
        })
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AuthError::CodeExchange(format!(
            "token exchange: HTTP {}",
            response.status().as_u16()
        )));
    }

    let exchanged: TokenExchangeResponse = response.json().await?;
    if exchanged.code.is_empty() {
        return Err(AuthError::CodeExchange(
            "token exchange returned no code".to_string(),
        ));
    }
    Ok(exchanged.code)
}

/// Submits the intermediate code to the callback URI and pulls the final
/// authorization code out of the resulting redirect.
pub async fn exchange_code_via_redirect(
    session: &AuthSession,
    callback_uri: &str,
    code: &str,
    state: &str,
) -> Result<String, AuthError> {
    debug!("Submitting intermediate code to identity provider callback");

    let response = session
        .client()
        .get(callback_uri)
        .query(&[("code", code), ("state", state)])
        .send()
        .await?;

    let location = redirect_location(&response).ok_or_else(|| {
        AuthError::CodeExchange(format!(
            "callback answered HTTP {} without a redirect",
            response.status().as_u16()
        ))
    })?;

    // The Location may be relative to the callback URI.
    let url = match Url::parse(&location) {
        Ok(url) => url,
        Err(_) => Url::parse(callback_uri)
            .and_then(|base| base.join(&location))
            .map_err(|e| AuthError::CodeExchange(format!("unparseable redirect: {e}")))?,
    };

    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AuthError::CodeExchange("redirect carried no authorization code".to_string()))
}

// ============================================================================
// Access Token
// ============================================================================

/// Response of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The platform bearer token.
    pub access_token: String,
    /// Lifetime in seconds, when the endpoint reports one.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Redeems the final authorization code at the token endpoint.
pub async fn exchange_for_access_token(
    session: &AuthSession,
    token_endpoint: &str,
    code: &str,
    pkce: &PkcePair,
    redirect_uri: &str,
) -> Result<TokenResponse, AuthError> {
    debug!("Redeeming authorization code at token endpoint");

    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("code_verifier", &pkce.verifier),
        ("redirect_uri", redirect_uri),
        ("client_id", PUBLIC_CLIENT_ID),
    ];

    let response = session.client().post(token_endpoint).form(&form).send().await?;

    if !response.status().is_success() {
        return Err(AuthError::TokenEndpoint(format!(
            "HTTP {}",
            response.status().as_u16()
        )));
    }

    let token: TokenResponse = response.json().await?;
    if token.access_token.is_empty() {
        return Err(AuthError::TokenEndpoint(
            "response carried no access token".to_string(),
        ));
    }
    Ok(token)
}

// ============================================================================
// Helpers
// ============================================================================

fn redirect_location(response: &reqwest::Response) -> Option<String> {
    if !response.status().is_redirection() {
        return None;
    }
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
