//! The `create` command: run one orchestration and stream its progress.

use anyhow::Result;
use tokio::sync::mpsc;

use appforge_client::ClientError;
use appforge_core::CoreError;
use appforge_engine::EngineError;

use crate::output;
use crate::{Cli, ExitCode};

/// Arguments for the create command.
#[derive(clap::Args)]
pub struct CreateArgs {
    /// The generation prompt (10 to 500 characters).
    pub prompt: String,
}

/// Runs the create command.
pub async fn run(args: &CreateArgs, cli: &Cli) -> Result<i32> {
    let config = match super::load_config(cli.quiet) {
        Ok(config) => config,
        Err(code) => return Ok(code),
    };
    let orchestrator = super::build_orchestrator(config)?;

    let (tx, mut rx) = mpsc::channel(32);
    let run = orchestrator.create_and_deploy(&args.prompt, tx);
    tokio::pin!(run);

    // Drive the run and drain its progress events concurrently. Interrupting
    // the process (or otherwise dropping this future) cancels the run.
    let mut result = None;
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => output::render_event(&event, cli),
                None => break,
            },
            finished = &mut run, if result.is_none() => {
                result = Some(finished);
            }
        }
    }

    let Some(result) = result else {
        return Ok(ExitCode::Error as i32);
    };

    match result {
        Ok(_url) => Ok(ExitCode::Success as i32),
        Err(error) => {
            // The sanitized message already went out as the Failed event.
            let code = match &error {
                EngineError::Client(ClientError::Timeout(_))
                | EngineError::PollTimeout { .. } => ExitCode::Timeout,
                EngineError::Core(CoreError::InvalidConfig(_)) => ExitCode::ConfigMissing,
                _ => ExitCode::Error,
            };
            Ok(code as i32)
        }
    }
}
