//! The `check` command: connectivity/credential check without a job run.

use anyhow::Result;

use appforge_engine::user_message;

use crate::{Cli, ExitCode, OutputFormat};

/// Runs the check command.
pub async fn run(cli: &Cli) -> Result<i32> {
    let config = match super::load_config(cli.quiet) {
        Ok(config) => config,
        Err(code) => return Ok(code),
    };
    let orchestrator = super::build_orchestrator(config)?;

    match orchestrator.check_connection().await {
        Ok(message) => {
            if cli.format == OutputFormat::Json {
                println!(
                    "{}",
                    serde_json::json!({ "ok": true, "message": message })
                );
            } else if cli.no_color {
                println!("✓ {message}");
            } else {
                println!("\x1b[32m✓\x1b[0m {message}");
            }
            Ok(ExitCode::Success as i32)
        }
        Err(error) => {
            let message = user_message(&error);
            if cli.format == OutputFormat::Json {
                println!(
                    "{}",
                    serde_json::json!({ "ok": false, "message": message })
                );
            } else if cli.no_color {
                eprintln!("✗ {message}");
            } else {
                eprintln!("\x1b[31m✗\x1b[0m {message}");
            }
            Ok(ExitCode::Error as i32)
        }
    }
}
