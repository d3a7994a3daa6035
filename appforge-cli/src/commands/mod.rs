//! CLI command implementations.

pub mod check;
pub mod config;
pub mod create;

use std::sync::Arc;

use anyhow::Result;
use appforge_auth::TokenCache;
use appforge_client::ApiClient;
use appforge_core::{CredentialSource, PlatformConfig};
use appforge_engine::{HttpPlatform, Orchestrator};

use crate::ExitCode;

/// Loads and validates the platform configuration.
///
/// Returns `Err(exit_code)` with the message already printed so commands can
/// exit with [`ExitCode::ConfigMissing`].
pub fn load_config(quiet: bool) -> Result<Arc<PlatformConfig>, i32> {
    let config = match PlatformConfig::load() {
        Ok(config) => config,
        Err(error) => {
            if !quiet {
                eprintln!("Error: {error}");
            }
            return Err(ExitCode::ConfigMissing as i32);
        }
    };

    if let Err(error) = config.validate() {
        if !quiet {
            eprintln!("Error: {error}");
        }
        return Err(ExitCode::ConfigMissing as i32);
    }

    Ok(Arc::new(config))
}

/// Wires the orchestrator for the given configuration.
pub fn build_orchestrator(config: Arc<PlatformConfig>) -> Result<Orchestrator> {
    let credentials: Arc<dyn CredentialSource> = Arc::new(TokenCache::new(config.clone()));
    let api = ApiClient::new(config.api_base())?;
    let platform = Arc::new(HttpPlatform::new(api, credentials.clone()));

    Ok(Orchestrator::new(platform, credentials, config))
}
