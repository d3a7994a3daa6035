//! Platform configuration.
//!
//! Configuration is loaded from a JSON file under the user config directory
//! and overlaid with environment variables. The account secret is never
//! printed; [`PlatformConfig`] has a redacting `Debug` implementation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::CoreError;

/// Environment variable for the tenant hostname.
const HOST_ENV: &str = "APPFORGE_HOST";

/// Environment variable for the account identifier.
const USERNAME_ENV: &str = "APPFORGE_USERNAME";

/// Environment variable for the account secret.
const PASSWORD_ENV: &str = "APPFORGE_PASSWORD";

/// Environment variable for the environment/stage identifier.
const ENVIRONMENT_ENV: &str = "APPFORGE_ENVIRONMENT";

// ============================================================================
// Platform Configuration
// ============================================================================

/// Configuration for one AppForge platform tenant.
#[derive(Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Tenant-specific management hostname, e.g. `acme.appforge.dev`.
    #[serde(default)]
    pub host: String,

    /// Account identifier used for the federated login.
    #[serde(default)]
    pub username: String,

    /// Account secret used for the federated login.
    #[serde(default)]
    pub password: String,

    /// Optional environment/stage identifier.
    #[serde(default)]
    pub environment: Option<String>,

    /// Base URL of the OIDC identity provider.
    #[serde(default = "default_identity_base")]
    pub identity_base: String,

    /// Refresh the bearer token when it expires within this many seconds.
    #[serde(default = "default_token_buffer_secs")]
    pub token_buffer_secs: u64,

    /// Token lifetime assumed when the token endpoint omits `expires_in`.
    #[serde(default = "default_token_expiry_fallback_secs")]
    pub token_expiry_fallback_secs: u64,

    /// Hostname suffix identifying the management host.
    #[serde(default = "default_management_suffix")]
    pub management_suffix: String,

    /// Hostname suffix of the live application host.
    #[serde(default = "default_apps_suffix")]
    pub apps_suffix: String,
}

fn default_identity_base() -> String {
    "https://id.appforge.dev".to_string()
}

fn default_token_buffer_secs() -> u64 {
    300
}

fn default_token_expiry_fallback_secs() -> u64 {
    3600
}

fn default_management_suffix() -> String {
    ".appforge.dev".to_string()
}

fn default_apps_suffix() -> String {
    ".forgeapps.dev".to_string()
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            environment: None,
            identity_base: default_identity_base(),
            token_buffer_secs: default_token_buffer_secs(),
            token_expiry_fallback_secs: default_token_expiry_fallback_secs(),
            management_suffix: default_management_suffix(),
            apps_suffix: default_apps_suffix(),
        }
    }
}

impl PlatformConfig {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("appforge")
            .join("config.json")
    }

    /// Loads configuration from the default path, overlaid with environment
    /// variables.
    pub fn load() -> Result<Self, CoreError> {
        let mut config = Self::load_from(&Self::default_path())?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a specific path without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Overlays environment variables onto this configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var(HOST_ENV) {
            if !host.is_empty() {
                self.host = host;
            }
        }
        if let Ok(username) = std::env::var(USERNAME_ENV) {
            if !username.is_empty() {
                self.username = username;
            }
        }
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            if !password.is_empty() {
                self.password = password;
            }
        }
        if let Ok(environment) = std::env::var(ENVIRONMENT_ENV) {
            if !environment.is_empty() {
                self.environment = Some(environment);
            }
        }
    }

    /// Validates that all required fields are present.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.is_empty() {
            return Err(CoreError::InvalidConfig(format!(
                "tenant hostname missing (set {HOST_ENV} or the config file)"
            )));
        }
        if self.username.is_empty() {
            return Err(CoreError::InvalidConfig(format!(
                "account identifier missing (set {USERNAME_ENV} or the config file)"
            )));
        }
        if self.password.is_empty() {
            return Err(CoreError::InvalidConfig(format!(
                "account secret missing (set {PASSWORD_ENV} or the config file)"
            )));
        }
        Ok(())
    }

    /// Base URL of the tenant's management API.
    pub fn api_base(&self) -> String {
        format!("https://{}", self.host)
    }

    /// Hostname serving the deployed application.
    ///
    /// Maps the management host suffix to the live-app suffix; a host that
    /// does not carry the management suffix is returned unchanged.
    pub fn live_app_host(&self) -> String {
        match self.host.strip_suffix(&self.management_suffix) {
            Some(tenant) => format!("{tenant}{}", self.apps_suffix),
            None => self.host.clone(),
        }
    }
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("environment", &self.environment)
            .field("identity_base", &self.identity_base)
            .field("token_buffer_secs", &self.token_buffer_secs)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
