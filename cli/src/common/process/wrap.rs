//! # Execution Wrapper (`common::process::wrap`)
//!
//! File: cli/src/common/process/wrap.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Binds a unit of work to the lifetime of a child process. The typical use is
//! a test or script that needs a helper process (a local server, a virtual
//! display, ...) alive only while some code runs:
//!
//! 1. start the process,
//! 2. sleep `startup_delay` so it can initialize (e.g. bind a port),
//! 3. run the work,
//! 4. stop the process (SIGTERM + wait) no matter how the work ended,
//! 5. return the work's value, or `WrappedExecution` carrying its error.
//!
//! Step 4 also runs while unwinding from a panic inside the work, so the
//! child is never left running once the returned closure has completed.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use procwrap::ProcessHandle;
//! use std::time::Duration;
//!
//! # fn main() -> procwrap::ProcResult<()> {
//! let mut server = ProcessHandle::new("python3 -m http.server 8123")?;
//! let answer = server.wrap(|| Ok::<_, std::io::Error>(42), Duration::from_millis(500))()?;
//! assert_eq!(answer, 42);
//! # Ok(())
//! # }
//! ```
//!
use super::handle::ProcessHandle;
use crate::core::error::{BoxError, ProcResult, ProcessError};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Returns a closure that runs `work` while `handle`'s process is alive.
///
/// The closure fails with `ProcessStart` (or `DoubleStart`) if the process
/// cannot be started, with `WrappedExecution` if `work` fails, and with the
/// stop error if stopping the process fails after successful work.
pub fn wrap<'a, T, E, F>(
    handle: &'a mut ProcessHandle,
    work: F,
    startup_delay: Duration,
) -> impl FnOnce() -> ProcResult<T> + 'a
where
    F: FnOnce() -> Result<T, E> + 'a,
    E: Into<BoxError> + 'a,
    T: 'a,
{
    move || {
        handle.start()?;
        let mut guard = StopGuard {
            handle,
            stopped: false,
        };

        if !startup_delay.is_zero() {
            debug!("waiting {:?} for the process to initialize", startup_delay);
            thread::sleep(startup_delay);
        }

        let outcome = work();
        let stopped = guard.stop();

        match outcome {
            Ok(value) => {
                stopped?;
                Ok(value)
            }
            Err(e) => {
                if let Err(stop_err) = stopped {
                    warn!("Failed to stop process after failed work: {}", stop_err);
                }
                let source = e.into();
                debug!("wrapped work failed: {}", source);
                Err(ProcessError::WrappedExecution {
                    process: guard.handle.to_string(),
                    source,
                })
            }
        }
    }
}

/// Stops the process on drop unless `stop()` already ran, covering panics in
/// the wrapped work.
struct StopGuard<'h> {
    handle: &'h mut ProcessHandle,
    stopped: bool,
}

impl StopGuard<'_> {
    fn stop(&mut self) -> ProcResult<()> {
        self.stopped = true;
        self.handle.stop().map(|_| ())
    }
}

impl Drop for StopGuard<'_> {
    fn drop(&mut self) {
        if !self.stopped && self.handle.is_running() {
            warn!("wrapped work panicked, stopping process");
            if let Err(e) = self.handle.stop() {
                warn!("Failed to stop process: {}", e);
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::common::process::command::Command;
    use std::io;
    use std::panic::{self, AssertUnwindSafe};

    fn sleeper() -> ProcessHandle {
        ProcessHandle::from_command(Command::with_resolver(["sleep", "30"], |_| None).unwrap())
    }

    #[test]
    fn test_wrap_returns_work_value_and_stops() {
        let mut handle = sleeper();
        let value = wrap(&mut handle, || Ok::<_, io::Error>("done"), Duration::ZERO)().unwrap();
        assert_eq!(value, "done");
        assert!(!handle.is_alive());
        assert_eq!(handle.exit_code(), Some(-(nix::sys::signal::Signal::SIGTERM as i32)));
    }

    #[test]
    fn test_wrap_work_error_is_wrapped() {
        let mut handle = sleeper();
        let err = wrap(
            &mut handle,
            || Err::<(), _>(io::Error::new(io::ErrorKind::ConnectionRefused, "no server")),
            Duration::ZERO,
        )()
        .unwrap_err();
        assert!(matches!(err, ProcessError::WrappedExecution { .. }));
        let cause = err.into_work_error().unwrap();
        let io_err = cause.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::ConnectionRefused);
        assert!(!handle.is_alive());
    }

    #[test]
    fn test_wrap_stops_process_on_panic() {
        let mut handle = sleeper();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            wrap(
                &mut handle,
                || -> Result<(), io::Error> { panic!("work exploded") },
                Duration::ZERO,
            )()
        }));
        assert!(result.is_err());
        assert!(!handle.is_alive());
        assert!(handle.exit_code().is_some());
    }

    #[test]
    fn test_wrap_start_failure_propagates() {
        let mut handle = ProcessHandle::from_command(
            Command::with_resolver(["nonexistent-binary-xyz"], |_| None).unwrap(),
        );
        let mut called = false;
        let err = wrap(
            &mut handle,
            || {
                called = true;
                Ok::<_, io::Error>(())
            },
            Duration::ZERO,
        )()
        .unwrap_err();
        assert!(matches!(err, ProcessError::ProcessStart { .. }));
        assert!(!called);
    }
}
