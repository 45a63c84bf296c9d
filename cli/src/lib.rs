//! # procwrap Library
//!
//! File: cli/src/lib.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Managed wrapper around external-process execution. Start a child process,
//! capture its output without deadlocking, wait for it, signal termination,
//! and get structured errors when anything goes wrong.
//!
//! ```rust,no_run
//! use procwrap::ProcessHandle;
//!
//! # fn main() -> procwrap::ProcResult<()> {
//! let mut echo = ProcessHandle::new(["echo", "hello"])?;
//! echo.run()?;
//! assert_eq!(echo.stdout(), Some("hello"));
//! # Ok(())
//! # }
//! ```
//!
//! The `procwrap` binary (`main.rs`) is a thin CLI over the same API; its
//! subcommand handlers live in `commands`.
//!
pub mod commands;
pub mod common;
pub mod core;

pub use crate::common::process::{
    wrap, CaptureMode, Command, CommandInput, ProcessHandle, ProcessState,
};
pub use crate::core::error::{BoxError, ProcResult, ProcessError};
