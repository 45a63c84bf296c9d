//! # procwrap Process Execution (`common::process`)
//!
//! File: cli/src/common/process/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Managed execution of external programs: building the argument vector,
//! spawning the child, capturing stdout/stderr without pipe deadlocks, waiting,
//! signaling termination, and binding a unit of work to a live child.
//!
//! ## Architecture
//!
//! - **`command`**: `CommandInput` (vector or shell string) -> `Command`
//!   (tokenized, alias-resolved, non-empty argument vector).
//! - **`sink`**: `CaptureMode` and the file-backed / pipe-backed output sinks.
//! - **`handle`**: `ProcessHandle`, the NotStarted -> Running -> Finished state
//!   machine owning one child.
//! - **`wrap`**: the execution wrapper (start, delay, work, always stop).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use procwrap::common::process::{CaptureMode, ProcessHandle};
//!
//! # fn main() -> procwrap::ProcResult<()> {
//! let mut ls = ProcessHandle::new(["ls", "-l"])?.with_capture(CaptureMode::Pipe);
//! ls.check_success(0)?;
//! println!("{}", ls.stdout().unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!

pub mod command;
pub mod handle;
pub mod sink;
pub mod wrap;

pub use command::{Command, CommandInput};
pub use handle::{ProcessHandle, ProcessState};
pub use sink::CaptureMode;
pub use wrap::wrap;
