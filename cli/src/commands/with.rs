//! # procwrap With Command
//!
//! File: cli/src/commands/with.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `procwrap with`: keep a background command alive only while
//! another command runs. The background command is started, given `--delay`
//! seconds to initialize, then the work command runs to completion and must
//! exit 0. The background command is always stopped (SIGTERM + wait) before
//! `procwrap` returns, also when the work command fails.
//!
//! ```bash
//! # Serve files while probing the server
//! procwrap with --server "python3 -m http.server 8123" --delay 0.5 -- curl -fsS localhost:8123
//! ```
//!
use super::{blocking, TargetArgs};
use crate::common::process::ProcessHandle;
use crate::core::error::{ProcResult, ProcessError, Result};
use anyhow::{anyhow, Context};
use clap::Parser;
use std::time::Duration;
use tracing::{debug, info};

/// Arguments for the `with` subcommand.
#[derive(Parser, Debug)]
#[command(about = "Run a command while a background command is kept alive")]
pub struct WithArgs {
    /// Background command (shell syntax, tokenized only) kept alive during the work.
    #[arg(long, short = 's')]
    pub server: String,

    /// Seconds to wait after starting the background command.
    #[arg(long, short = 'd', default_value_t = 0.0, allow_negative_numbers = true)]
    pub delay: f64,

    #[command(flatten)]
    pub work: TargetArgs,
}

/// Handler for `procwrap with`.
pub async fn handle_with(args: WithArgs) -> Result<()> {
    info!("Handling with command...");
    debug!("With args: {:?}", args);

    let delay = Duration::try_from_secs_f64(args.delay)
        .map_err(|e| anyhow!("Invalid --delay {}: {}", args.delay, e))?;
    let mut server = ProcessHandle::new(args.server.as_str())
        .context("Failed to prepare the background command")?;
    let mut work = args.work.build_handle()?;

    let output = blocking(move || -> ProcResult<Option<String>> {
        let wrapped = server.wrap(
            move || -> ProcResult<Option<String>> {
                work.check_success(0)?;
                Ok(work.stdout().map(str::to_owned))
            },
            delay,
        );
        let result = wrapped();
        debug!("Background command after stop: {}", server);
        result
    })
    .await
    .map_err(unwrap_work_error)?;

    if let Some(out) = output.filter(|s| !s.is_empty()) {
        println!("{}", out);
    }
    Ok(())
}

/// Surfaces the work command's own failure instead of the wrapper around it.
fn unwrap_work_error(error: anyhow::Error) -> anyhow::Error {
    match error.downcast::<ProcessError>() {
        Ok(process_error) => match process_error.into_work_error() {
            Ok(work_error) => match work_error.downcast::<ProcessError>() {
                Ok(inner) => anyhow!(*inner),
                Err(other) => anyhow!(other),
            },
            Err(not_wrapped) => anyhow!(not_wrapped),
        },
        Err(other) => other,
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_args_parsing() {
        let args = WithArgs::try_parse_from([
            "with", "--server", "sleep 5", "--delay", "0.25", "--", "echo", "hi",
        ])
        .unwrap();
        assert_eq!(args.server, "sleep 5");
        assert_eq!(args.delay, 0.25);
        assert_eq!(args.work.argv, vec!["echo", "hi"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_handle_with_success_and_failure() {
        let ok = WithArgs::try_parse_from(["with", "-s", "sleep 30", "--", "echo", "hi"]).unwrap();
        assert!(handle_with(ok).await.is_ok());

        let bad = WithArgs::try_parse_from(["with", "-s", "sleep 30", "--", "false"]).unwrap();
        let err = handle_with(bad).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProcessError>(),
            Some(ProcessError::UnexpectedExitCode { .. })
        ));
    }

    #[tokio::test]
    async fn test_handle_with_rejects_negative_delay() {
        let args = WithArgs::try_parse_from([
            "with", "-s", "sleep 30", "--delay", "-1", "--", "true",
        ])
        .unwrap();
        let err = handle_with(args).await.unwrap_err();
        assert!(err.to_string().contains("Invalid --delay"));
    }
}
