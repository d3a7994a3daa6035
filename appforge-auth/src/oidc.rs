//! OIDC metadata discovery.

use serde::Deserialize;
use tracing::debug;

use crate::error::AuthError;
use crate::session::AuthSession;

/// Subset of the OIDC discovery document used by the exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct OidcConfiguration {
    /// Authorization endpoint URL.
    pub authorization_endpoint: String,
    /// Token endpoint URL.
    pub token_endpoint: String,
    /// Issuer identifier.
    #[serde(default)]
    pub issuer: Option<String>,
}

/// Fetches the identity provider's discovery document.
///
/// Metadata endpoints are static; a failure here indicates misconfiguration
/// rather than transience and is never retried.
pub async fn discover(
    session: &AuthSession,
    identity_base: &str,
) -> Result<OidcConfiguration, AuthError> {
    let url = format!(
        "{}/.well-known/openid-configuration",
        identity_base.trim_end_matches('/')
    );
    debug!(url = %url, "Fetching OIDC discovery document");

    let response = session.client().get(&url).send().await?;
    if !response.status().is_success() {
        return Err(AuthError::Discovery(format!(
            "HTTP {}",
            response.status().as_u16()
        )));
    }

    Ok(response.json::<OidcConfiguration>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_discovery_document() {
        let json = r#"{
            "issuer": "https://id.appforge.dev",
            "authorization_endpoint": "https://id.appforge.dev/oauth/authorize",
            "token_endpoint": "https://id.appforge.dev/oauth/token",
            "jwks_uri": "https://id.appforge.dev/oauth/jwks"
        }"#;

        let config: OidcConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.authorization_endpoint,
            "https://id.appforge.dev/oauth/authorize"
        );
        assert_eq!(config.token_endpoint, "https://id.appforge.dev/oauth/token");
    }
}
