//! # procwrap Run Command
//!
//! File: cli/src/commands/run.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `procwrap run`: start a command, wait for it, print what it wrote
//! to stdout/stderr (one trailing newline already stripped) and report its exit
//! code. A non-zero exit code becomes the exit status of `procwrap` itself.
//!
//! ## Examples
//!
//! ```bash
//! # Argument vector form
//! procwrap run -- ls -l /tmp
//!
//! # Shell-syntax string (tokenized, not interpreted)
//! procwrap run -c "grep -r 'hello world' src"
//!
//! # Capture through pipes instead of scratch files
//! procwrap run --capture pipe -- cargo --version
//! ```
//!
use super::{blocking, print_output, TargetArgs};
use crate::core::error::{ProcessError, Result};
use clap::Parser;
use tracing::{debug, info, warn};

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
#[command(about = "Run a command to completion and print its output")]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Handler for `procwrap run`.
pub async fn handle_run(args: RunArgs) -> Result<()> {
    info!("Handling run command...");
    debug!("Run args: {:?}", args);

    let mut handle = args.target.build_handle()?;
    let handle = blocking(move || {
        handle.run()?;
        Ok(handle)
    })
    .await?;

    print_output(&handle);

    match handle.exit_code() {
        Some(0) => {
            info!("Command finished successfully (exit code 0).");
            Ok(())
        }
        actual => {
            warn!("Command finished with exit code {:?}.", actual);
            Err(ProcessError::UnexpectedExitCode {
                process: handle.to_string(),
                expected: 0,
                actual,
            }
            .into())
        }
    }
}
