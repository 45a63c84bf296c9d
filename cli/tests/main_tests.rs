//! # procwrap CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Verifies the top-level behavior of the `procwrap` binary: `--help`,
//! `--version`, and rejection of unknown subcommands.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_main_help_flag() {
    procwrap_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("installed"));
}

#[test]
fn test_main_version_flag() {
    procwrap_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand() {
    procwrap_cmd().arg("frobnicate").assert().failure();
}

#[test]
fn test_missing_command_is_error() {
    procwrap_cmd()
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid command"));
}
