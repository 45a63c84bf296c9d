//! # procwrap Check Command
//!
//! File: cli/src/commands/check.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `procwrap check`: run a command to completion and fail unless it
//! exits with the expected code (0 by default). Output is printed either way,
//! which makes the command handy in scripts that need success-or-die semantics.
//!
//! ```bash
//! procwrap check -- make test
//! procwrap check --expect 1 -- grep -q needle haystack.txt
//! ```
//!
use super::{blocking, print_output, TargetArgs};
use crate::core::error::{ProcessError, Result};
use clap::Parser;
use tracing::{debug, info};

/// Arguments for the `check` subcommand.
#[derive(Parser, Debug)]
#[command(about = "Run a command and fail unless it exits with the expected code")]
pub struct CheckArgs {
    /// Exit code the command must return.
    #[arg(long, short = 'e', default_value_t = 0, allow_negative_numbers = true)]
    pub expect: i32,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Handler for `procwrap check`.
pub async fn handle_check(args: CheckArgs) -> Result<()> {
    info!("Handling check command...");
    debug!("Check args: {:?}", args);

    let expected = args.expect;
    let handle = args.target.build_handle()?;
    let (handle, outcome) = blocking(move || {
        let mut handle = handle;
        let outcome = handle.check_success(expected).map(|_| ());
        Ok::<_, ProcessError>((handle, outcome))
    })
    .await?;

    print_output(&handle);
    outcome?;
    info!("Command exited with the expected code {}.", expected);
    Ok(())
}
