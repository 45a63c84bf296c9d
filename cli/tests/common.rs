//! # procwrap Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`. Each `.rs`
//! file there (other than this module) is compiled as a separate test crate
//! linked against the `procwrap` library and binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use procwrap::{Command as ProcCommand, ProcessHandle};

/// # Get procwrap Command (`procwrap_cmd`)
///
/// Returns an `assert_cmd::Command` pointing to the compiled `procwrap` binary.
///
/// `PROCWRAP_CONFIG` is pointed at a path that does not exist so the user's
/// own alias file never influences the tests.
///
/// ## Panics
/// Panics if the `procwrap` binary cannot be found via `Command::cargo_bin`.
pub fn procwrap_cmd() -> Command {
    let mut cmd = Command::cargo_bin("procwrap").expect("Failed to find procwrap binary for testing");
    cmd.env("PROCWRAP_CONFIG", "/nonexistent/procwrap-test-config.toml");
    cmd
}

/// Builds a handle without consulting the user's alias table.
pub fn handle<I>(input: I) -> ProcessHandle
where
    I: Into<procwrap::CommandInput>,
{
    let command = ProcCommand::with_resolver(input, |_| None).expect("valid test command");
    ProcessHandle::from_command(command)
}
