//! # procwrap Alias Resolution Integration Test
//!
//! File: cli/tests/alias.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Exercises the lazily loaded, process-wide alias table through the public
//! API. Kept in its own test crate (its own process) because the table is
//! loaded only once per process.
//!
#![cfg(unix)]

use procwrap::core::config;
use procwrap::ProcessHandle;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_global_alias_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[aliases]\nshout = \"echo\"\n").unwrap();
    std::env::set_var(config::CONFIG_ENV_VAR, &path);

    assert_eq!(config::resolve_alias("shout").as_deref(), Some("echo"));
    assert_eq!(config::resolve_alias("whisper"), None);

    // Loaded once: later edits to the file are not observed.
    fs::write(&path, "[aliases]\nshout = \"printf\"\n").unwrap();
    assert_eq!(config::aliases().get("shout"), Some("echo"));

    let mut h = ProcessHandle::new("shout hello").unwrap();
    h.run().unwrap();
    assert_eq!(h.command().alias(), Some("echo"));
    assert_eq!(h.command().display(), "shout hello");
    assert_eq!(h.stdout(), Some("hello"));
}
