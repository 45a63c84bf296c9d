//! # procwrap Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the subcommands of the `procwrap` CLI and the
//! argument types they share. Every handler follows the same shape:
//! 1. Build a `ProcessHandle` from the parsed arguments
//! 2. Move the blocking lifecycle work onto `tokio::task::spawn_blocking`
//! 3. Print the captured output
//! 4. Return a unified `Result` that `main.rs` turns into an exit status
//!
//! ## Command Groups
//!
//! - `run`: Run a command to completion and print its output
//! - `check`: Success-or-die execution with an expected exit code
//! - `installed`: Verify that a program can be spawned at all
//! - `with`: Keep a background command alive while another command runs
//!
use crate::common::process::{CaptureMode, CommandInput, ProcessHandle};
use crate::core::error::{ProcessError, Result};
use anyhow::{anyhow, Context};
use clap::Args;

/// Success-or-die execution with an expected exit code.
pub mod check;
/// Verifies that a program is installed.
pub mod installed;
/// Runs a command to completion and prints its output.
pub mod run;
/// Wraps a command's execution around a background process.
pub mod with;

/// Arguments describing the command to execute, shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// The command as one shell-syntax string (e.g. "ls -l 'my dir'"). It is
    /// tokenized like a shell would, but never run through a shell.
    #[arg(short = 'c', long = "shell", conflicts_with = "argv")]
    pub shell: Option<String>,

    /// Output capture strategy: "file" (scratch files, default) or "pipe".
    #[arg(long, default_value_t = CaptureMode::File)]
    pub capture: CaptureMode,

    /// The command and its arguments, given after `--`.
    #[arg(id = "argv", last = true)]
    pub argv: Vec<String>,
}

impl TargetArgs {
    /// Resolves the raw command input from `--shell` or the trailing arguments.
    pub fn input(&self) -> Result<CommandInput> {
        match (&self.shell, self.argv.is_empty()) {
            (Some(line), _) => Ok(CommandInput::Shell(line.clone())),
            (None, false) => Ok(CommandInput::Vector(self.argv.clone())),
            (None, true) => Err(anyhow!(ProcessError::InvalidCommand {
                reason: "no command given; pass --shell \"CMD\" or `-- CMD ARGS...`".to_string(),
            })),
        }
    }

    /// Builds the process handle (alias resolution happens here).
    pub fn build_handle(&self) -> Result<ProcessHandle> {
        let handle = ProcessHandle::new(self.input()?)?.with_capture(self.capture);
        tracing::debug!("Prepared handle: {}", handle);
        Ok(handle)
    }
}

/// Runs blocking process work on tokio's blocking pool.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, ProcessError> + Send + 'static,
    T: Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(work)
        .await
        .context("Process task panicked or was cancelled")?;
    Ok(outcome?)
}

/// Prints captured output: stdout to stdout, stderr to stderr.
///
/// Each stream gets back the one trailing newline that capture stripped. An
/// empty stream prints nothing at all, so a child that wrote a single blank
/// line looks the same as one that wrote nothing.
pub(crate) fn print_output(handle: &ProcessHandle) {
    if let Some(out) = handle.stdout().filter(|s| !s.is_empty()) {
        println!("{}", out);
    }
    if let Some(err) = handle.stderr().filter(|s| !s.is_empty()) {
        eprintln!("{}", err);
    }
}

/// Maps a failed command to the exit status of the `procwrap` process.
///
/// A child's own non-zero exit code (1..=255) is passed through; every other
/// failure exits with 1.
pub fn exit_status_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ProcessError>() {
        Some(ProcessError::UnexpectedExitCode {
            actual: Some(code), ..
        }) if (1..=255).contains(code) => *code,
        _ => 1,
    }
}
