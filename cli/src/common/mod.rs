//! # procwrap Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared building blocks used by the command handlers (`commands::`) and
//! exposed through the library API:
//!
//! - **`process`**: Managed execution of external programs: command parsing,
//!   output capture, the `ProcessHandle` lifecycle and the execution wrapper.
//! - **`system`**: Host inspection (OS distribution detection) and the
//!   "program not installed" remediation message.
//!

/// Managed execution of external processes.
pub mod process;
/// Host system inspection and install diagnostics.
pub mod system;
