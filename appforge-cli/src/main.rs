// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! AppForge CLI - generate and deploy applications from natural-language
//! prompts.
//!
//! # Examples
//!
//! ```bash
//! # Generate and deploy an application
//! appforge create "a todo tracker with due dates and reminders"
//!
//! # Stream progress as JSON for scripting
//! appforge create "an expense report tool" --format json
//!
//! # Verify connectivity and credentials
//! appforge check
//!
//! # Inspect the resolved configuration
//! appforge config show
//! appforge config path
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// AppForge CLI - prompt-to-deployed-application orchestration.
#[derive(Parser)]
#[command(name = "appforge")]
#[command(about = "Generate and deploy applications from natural-language prompts")]
#[command(long_about = r#"
AppForge turns a natural-language prompt into a generated, deployed
application on your tenant.

Configuration comes from the config file (see `appforge config path`) and
the APPFORGE_HOST, APPFORGE_USERNAME, APPFORGE_PASSWORD and
APPFORGE_ENVIRONMENT environment variables.

Examples:
  appforge create "a todo tracker"     # Generate and deploy
  appforge create ... --format json    # One JSON object per progress event
  appforge check                       # Connectivity/credential check
  appforge config show                 # Resolved configuration (secret redacted)
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (terminal events only).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate and deploy an application from a prompt.
    #[command(visible_alias = "c")]
    Create(commands::create::CreateArgs),

    /// Check connectivity and credentials.
    Check,

    /// Manage configuration.
    Config(commands::config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Configuration missing or invalid.
    ConfigMissing = 2,
    /// Timeout.
    Timeout = 4,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("appforge=debug,info")
    } else {
        EnvFilter::new("appforge=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result: Result<i32> = match &cli.command {
        Commands::Create(args) => commands::create::run(args, &cli).await,
        Commands::Check => commands::check::run(&cli).await,
        Commands::Config(args) => commands::config::run(args, &cli),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            if !cli.quiet {
                eprintln!("Error: {error}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cli = Cli::parse_from(["appforge", "create", "a todo tracker app"]);
        match cli.command {
            Commands::Create(args) => assert_eq!(args.prompt, "a todo tracker app"),
            _ => panic!("expected create command"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from([
            "appforge", "create", "a prompt", "--format", "json", "--quiet", "--no-color",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
        assert!(cli.no_color);
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from(["appforge", "check"]);
        assert!(matches!(cli.command, Commands::Check));
    }
}
