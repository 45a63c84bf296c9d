//! # procwrap Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error taxonomy reported by the process-management
//! core, plus the general-purpose `Result` alias used by configuration loading
//! and the CLI handlers.
//!
//! ## Architecture
//!
//! The error system consists of three pieces:
//! - `ProcessError`: A `thiserror` enum with one variant per failure kind of the
//!   process lifecycle (invalid command, misuse of start/stop, spawn failure,
//!   termination signal failure, unexpected exit code, missing program,
//!   failed wrapped work, capture I/O).
//! - `ProcResult<T>`: `std::result::Result<T, ProcessError>`, returned by every
//!   `ProcessHandle` operation so callers can `match` on the exact kind.
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible,
//!   context-rich error handling at the application level.
//!
//! Variants that concern a specific process carry `process`, a one-line
//! rendering of the handle (see `ProcessHandle`'s `Display`), so that error
//! messages always identify which child failed.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use procwrap::{ProcessError, ProcessHandle};
//!
//! let mut handle = ProcessHandle::new(["nonexistent-binary-xyz"]).unwrap();
//! match handle.start() {
//!     Err(ProcessError::ProcessStart { source, .. }) => eprintln!("spawn failed: {}", source),
//!     Err(other) => eprintln!("unexpected: {}", other),
//!     Ok(_) => {}
//! }
//! ```
//!
use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Boxed error type accepted from the work run inside an `ExecutionWrapper`.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure kinds of the process lifecycle.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The command resolved to an empty argument vector, or a command string
    /// could not be tokenized (e.g. an unterminated quote).
    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    /// `start()` was called on a handle that was already started.
    #[error("Process was started twice! {process}")]
    DoubleStart { process: String },

    /// `send_terminate()`/`stop()` was called without an active start, or twice.
    #[error("Process was stopped twice! {process}")]
    DoubleStop { process: String },

    /// The OS refused to spawn the child (missing executable, permissions, ...).
    #[error("Start error: {source}. {process}")]
    ProcessStart {
        process: String,
        #[source]
        source: io::Error,
    },

    /// Delivering the termination signal to a live child failed.
    #[error("Failed to send termination signal: {source}. {process}")]
    Terminate {
        process: String,
        #[source]
        source: io::Error,
    },

    /// `check_success()` observed an exit code other than the expected one.
    #[error("Check error, return code is {actual:?} (expected {expected})! {process}")]
    UnexpectedExitCode {
        process: String,
        expected: i32,
        actual: Option<i32>,
    },

    /// `check_installed()` could not spawn the program at all.
    /// `message` is the rendered remediation text (command, OS error, hints).
    #[error("{message}")]
    NotInstalled {
        message: String,
        #[source]
        source: io::Error,
    },

    /// The work executed inside an `ExecutionWrapper` failed. The process has
    /// already been stopped when this is returned.
    #[error("Wrap error! {process}")]
    WrappedExecution {
        process: String,
        #[source]
        source: BoxError,
    },

    /// Reading back the captured stdout/stderr failed.
    #[error("Failed to collect process output: {source}. {process}")]
    OutputCapture {
        process: String,
        #[source]
        source: io::Error,
    },
}

impl ProcessError {
    /// Consumes a `WrappedExecution` error and returns the original failure of
    /// the wrapped work. Other variants are returned unchanged in `Err`.
    pub fn into_work_error(self) -> std::result::Result<BoxError, ProcessError> {
        match self {
            ProcessError::WrappedExecution { source, .. } => Ok(source),
            other => Err(other),
        }
    }
}

/// Result type returned by the process-management core.
pub type ProcResult<T> = std::result::Result<T, ProcessError>;

/// Type alias for Result using anyhow::Error for application-level code.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let invalid = ProcessError::InvalidCommand {
            reason: "empty command!".into(),
        };
        assert_eq!(invalid.to_string(), "Invalid command: empty command!");

        let unexpected = ProcessError::UnexpectedExitCode {
            process: "<ProcessHandle cmd=[\"false\"]>".into(),
            expected: 0,
            actual: Some(1),
        };
        assert_eq!(
            unexpected.to_string(),
            "Check error, return code is Some(1) (expected 0)! <ProcessHandle cmd=[\"false\"]>"
        );
    }

    #[test]
    fn test_start_error_keeps_os_cause() {
        let err = ProcessError::ProcessStart {
            process: "p".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        let cause = err
            .source()
            .and_then(|s| s.downcast_ref::<io::Error>())
            .expect("source should be the io::Error");
        assert_eq!(cause.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_into_work_error() {
        let err = ProcessError::WrappedExecution {
            process: "p".into(),
            source: Box::new(io::Error::new(io::ErrorKind::Other, "boom")),
        };
        let work_err = err.into_work_error().expect("wrapped error");
        assert_eq!(work_err.to_string(), "boom");

        let other = ProcessError::InvalidCommand { reason: "x".into() };
        assert!(other.into_work_error().is_err());
    }
}
