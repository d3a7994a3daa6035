//! The `config` command: inspect the resolved configuration.

use anyhow::Result;

use appforge_core::PlatformConfig;

use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(clap::Args)]
pub struct ConfigArgs {
    /// What to do with the configuration.
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration (secret redacted).
    Show,
    /// Print the configuration file path.
    Path,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<i32> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", PlatformConfig::default_path().display());
            Ok(ExitCode::Success as i32)
        }
        ConfigCommand::Show => {
            let mut config = PlatformConfig::load()?;
            config.password = if config.password.is_empty() {
                "<unset>".to_string()
            } else {
                "<redacted>".to_string()
            };

            if cli.format == OutputFormat::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "host": config.host,
                        "username": config.username,
                        "password": config.password,
                        "environment": config.environment,
                        "identityBase": config.identity_base,
                        "tokenBufferSecs": config.token_buffer_secs,
                    })
                );
            } else {
                println!("host:          {}", display_or_unset(&config.host));
                println!("username:      {}", display_or_unset(&config.username));
                println!("password:      {}", config.password);
                println!(
                    "environment:   {}",
                    config.environment.as_deref().unwrap_or("<unset>")
                );
                println!("identity base: {}", config.identity_base);
            }
            Ok(ExitCode::Success as i32)
        }
    }
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() { "<unset>" } else { value }
}
