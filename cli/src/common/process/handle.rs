//! # Process Handle (`common::process::handle`)
//!
//! File: cli/src/common/process/handle.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `ProcessHandle` owns exactly one child process and drives it through its
//! lifecycle:
//!
//! ```text
//! NotStarted --start()--> Running --wait()--> Finished
//!                            |
//!                     send_terminate() (SIGTERM, state unchanged until wait())
//! ```
//!
//! - `start()` is legal only from `NotStarted` (`DoubleStart` otherwise).
//! - `send_terminate()` is legal once per start, while `Running` (`DoubleStop`
//!   otherwise).
//! - `wait()` reaps the child, drains the output sink, strips one trailing
//!   newline from each stream and moves to `Finished`. It is a no-op on a handle
//!   that is not running.
//! - A handle is single-use: `Finished` handles can be inspected, never
//!   restarted. Build a new one from the same `Command` to run again.
//!
//! Convenience compositions: `run()` (start + wait), `stop()` (send_terminate +
//! wait), `check_success()`, `check_installed()` and `wrap()`.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use procwrap::ProcessHandle;
//!
//! # fn main() -> procwrap::ProcResult<()> {
//! let mut handle = ProcessHandle::new("echo hello")?;
//! handle.run()?;
//! assert_eq!(handle.exit_code(), Some(0));
//! assert_eq!(handle.stdout(), Some("hello"));
//! # Ok(())
//! # }
//! ```
//!
use super::command::{Command, CommandInput};
use super::sink::{normalize, CaptureMode, OutputSink};
use super::wrap;
use crate::common::system;
use crate::core::error::{BoxError, ProcResult, ProcessError};
use std::fmt;
use std::io;
use std::process::{Child, ExitStatus, Stdio};
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Lifecycle state of a `ProcessHandle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    NotStarted,
    Running,
    Finished,
}

/// Owner of a single child process and its captured results.
#[derive(Debug)]
pub struct ProcessHandle {
    command: Command,
    capture: CaptureMode,
    state: ProcessState,
    child: Option<Child>,
    sink: Option<OutputSink>,
    terminate_sent: bool,
    stdout: Option<String>,
    stderr: Option<String>,
    exit_code: Option<i32>,
    os_error: Option<String>,
    install_hint: Option<String>,
    homepage: Option<String>,
}

impl ProcessHandle {
    /// Builds a handle from a string (`"ls -l"`) or a vector (`["ls", "-l"]`).
    ///
    /// # Errors
    ///
    /// `ProcessError::InvalidCommand` for an empty or untokenizable command.
    pub fn new(input: impl Into<CommandInput>) -> ProcResult<Self> {
        Ok(Self::from_command(Command::new(input)?))
    }

    /// Builds a handle around an already resolved `Command`.
    pub fn from_command(command: Command) -> Self {
        Self {
            command,
            capture: CaptureMode::default(),
            state: ProcessState::NotStarted,
            child: None,
            sink: None,
            terminate_sent: false,
            stdout: None,
            stderr: None,
            exit_code: None,
            os_error: None,
            install_hint: None,
            homepage: None,
        }
    }

    /// Selects the output capture strategy (file-backed by default).
    pub fn with_capture(mut self, capture: CaptureMode) -> Self {
        self.capture = capture;
        self
    }

    /// Package name suggested to the user when the program is not installed.
    pub fn with_install_hint(mut self, package: impl Into<String>) -> Self {
        self.install_hint = Some(package.into());
        self
    }

    /// Homepage shown to the user when the program is not installed.
    pub fn with_homepage(mut self, url: impl Into<String>) -> Self {
        self.homepage = Some(url.into());
        self
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn capture(&self) -> CaptureMode {
        self.capture
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// OS process id, once started.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Exit code, once the OS process has exited. A child killed by signal `N`
    /// reports `-N` on Unix.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Captured stdout, available after `wait()`.
    pub fn stdout(&self) -> Option<&str> {
        self.stdout.as_deref()
    }

    /// Captured stderr, available after `wait()`.
    pub fn stderr(&self) -> Option<&str> {
        self.stderr.as_deref()
    }

    /// Last OS-level failure seen while spawning (e.g. executable not found).
    pub fn os_error(&self) -> Option<&str> {
        self.os_error.as_deref()
    }

    pub fn install_hint(&self) -> Option<&str> {
        self.install_hint.as_deref()
    }

    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref()
    }

    /// Spawns the child without waiting for it.
    ///
    /// # Errors
    ///
    /// - `DoubleStart` if the handle has been started before.
    /// - `ProcessStart` if the OS cannot spawn the program; the cause is kept
    ///   in `os_error()` and the handle stays `NotStarted`.
    /// - `OutputCapture` if the output sink cannot be prepared (e.g. no usable
    ///   temp directory). The program was never tried, so `os_error()` is untouched.
    pub fn start(&mut self) -> ProcResult<&mut Self> {
        if self.state != ProcessState::NotStarted {
            return Err(ProcessError::DoubleStart {
                process: self.to_string(),
            });
        }

        let sink = OutputSink::new(self.capture).map_err(|e| self.capture_failed(e))?;
        let (stdout, stderr) = sink.stdio().map_err(|e| self.capture_failed(e))?;

        let mut cmd = self.command.to_std();
        cmd.stdin(Stdio::null()).stdout(stdout).stderr(stderr);

        let child = cmd.spawn().map_err(|e| self.start_failed(e))?;
        debug!("process was started (pid={})", child.id());

        self.child = Some(child);
        self.sink = Some(sink);
        self.terminate_sent = false;
        self.state = ProcessState::Running;
        Ok(self)
    }

    fn capture_failed(&self, source: io::Error) -> ProcessError {
        warn!("Cannot prepare output capture ({}): {}", self.capture, source);
        ProcessError::OutputCapture {
            process: self.to_string(),
            source,
        }
    }

    fn start_failed(&mut self, source: io::Error) -> ProcessError {
        debug!("OSError while starting {:?}: {}", self.command.args(), source);
        self.os_error = Some(source.to_string());
        ProcessError::ProcessStart {
            process: self.to_string(),
            source,
        }
    }

    /// Non-blocking liveness poll. False before `start()` and after `wait()`.
    pub fn is_alive(&mut self) -> bool {
        if self.state != ProcessState::Running {
            return false;
        }
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                self.exit_code = exit_code_of(status);
                false
            }
            Err(e) => {
                warn!("Failed to poll process (pid={}): {}", child.id(), e);
                self.os_error = Some(e.to_string());
                false
            }
        }
    }

    /// Blocks until the child exits, then collects and normalizes its output.
    ///
    /// Returns immediately if the handle is not running.
    ///
    /// # Errors
    ///
    /// `OutputCapture` if waiting or reading back the output fails. The sink is
    /// released and the handle is `Finished` either way.
    pub fn wait(&mut self) -> ProcResult<&mut Self> {
        if self.state != ProcessState::Running {
            debug!("wait() on a process that is not running ({:?})", self.state);
            return Ok(self);
        }

        let collected = match (self.child.as_mut(), self.sink.take()) {
            (Some(child), Some(sink)) => Some(sink.collect(child)),
            _ => None,
        };
        self.state = ProcessState::Finished;

        match collected {
            Some(Ok(collected)) => {
                debug!("process has ended");
                self.exit_code = exit_code_of(collected.status);
                self.stdout = Some(normalize(&collected.stdout));
                self.stderr = Some(normalize(&collected.stderr));
                debug!("return code={:?}", self.exit_code);
                debug!("stdout={}", self.stdout.as_deref().unwrap_or_default());
                debug!("stderr={}", self.stderr.as_deref().unwrap_or_default());
                Ok(self)
            }
            Some(Err(source)) => Err(ProcessError::OutputCapture {
                process: self.to_string(),
                source,
            }),
            None => {
                warn!("Running process without child or sink: {}", self);
                Ok(self)
            }
        }
    }

    /// Requests termination (SIGTERM) without waiting for the exit.
    ///
    /// A child that already exited is left alone. The state stays `Running`
    /// until `wait()` reaps it.
    ///
    /// # Errors
    ///
    /// - `DoubleStop` if the handle is not running or was already signaled.
    /// - `Terminate` if the signal cannot be delivered.
    pub fn send_terminate(&mut self) -> ProcResult<&mut Self> {
        if self.state != ProcessState::Running || self.terminate_sent {
            return Err(ProcessError::DoubleStop {
                process: self.to_string(),
            });
        }
        self.terminate_sent = true;

        debug!(
            "stopping process (pid={:?} cmd={:?})",
            self.pid(),
            self.command.args()
        );
        if !self.is_alive() {
            debug!("process was already stopped");
            return Ok(self);
        }

        debug!("process is active -> sending SIGTERM");
        let signaled = match self.child.as_mut() {
            Some(child) => terminate(child),
            None => Ok(()),
        };
        if let Err(source) = signaled {
            self.os_error = Some(source.to_string());
            return Err(ProcessError::Terminate {
                process: self.to_string(),
                source,
            });
        }
        Ok(self)
    }

    /// `send_terminate()` followed by `wait()`.
    pub fn stop(&mut self) -> ProcResult<&mut Self> {
        self.send_terminate()?;
        self.wait()
    }

    /// `start()` followed by `wait()`: the synchronous execution path.
    pub fn run(&mut self) -> ProcResult<&mut Self> {
        self.start()?;
        self.wait()
    }

    /// Runs the process to completion and requires exit code `expected`.
    ///
    /// # Errors
    ///
    /// Anything `run()` returns, or `UnexpectedExitCode`.
    pub fn check_success(&mut self, expected: i32) -> ProcResult<&mut Self> {
        self.run()?;
        if self.exit_code != Some(expected) {
            return Err(ProcessError::UnexpectedExitCode {
                process: self.to_string(),
                expected,
                actual: self.exit_code,
            });
        }
        Ok(self)
    }

    /// Runs the process to completion to find out whether it can be spawned.
    ///
    /// Only a spawn failure counts as "not installed"; any exit code is fine.
    ///
    /// # Errors
    ///
    /// `NotInstalled` with a rendered remediation message when the spawn fails,
    /// otherwise anything `run()` returns.
    pub fn check_installed(&mut self) -> ProcResult<&mut Self> {
        let outcome = self.run().map(|_| ());
        match outcome {
            Err(ProcessError::ProcessStart { source, .. }) => Err(ProcessError::NotInstalled {
                message: system::diagnostic_hint(self),
                source,
            }),
            Err(other) => Err(other),
            Ok(()) => Ok(self),
        }
    }

    /// Binds `work` to the lifetime of this process; see `wrap::wrap`.
    pub fn wrap<'a, T, E, F>(
        &'a mut self,
        work: F,
        startup_delay: Duration,
    ) -> impl FnOnce() -> ProcResult<T> + 'a
    where
        F: FnOnce() -> Result<T, E> + 'a,
        E: Into<BoxError> + 'a,
        T: 'a,
    {
        wrap::wrap(self, work, startup_delay)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state == ProcessState::Running
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ProcessHandle input={} alias={:?} cmd={:?} ({}) os_error={:?} exit_code={:?} stdout={:?} stderr={:?}>",
            self.command.input(),
            self.command.alias(),
            self.command.args(),
            self.command.args().join(" "),
            self.os_error,
            self.exit_code,
            preview(self.stdout.as_deref()),
            preview(self.stderr.as_deref()),
        )
    }
}

const PREVIEW_CHARS: usize = 200;

fn preview(text: Option<&str>) -> Option<String> {
    text.map(|t| match t.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &t[..cut]),
        None => t.to_string(),
    })
}

fn exit_code_of(status: ExitStatus) -> Option<i32> {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status.code().or_else(|| status.signal().map(|sig| -sig))
    }
    #[cfg(not(unix))]
    {
        status.code()
    }
}

#[cfg(unix)]
fn terminate(child: &mut Child) -> io::Result<()> {
    let pid = Pid::from_raw(child.id() as i32);
    signal::kill(pid, Signal::SIGTERM).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) -> io::Result<()> {
    child.kill()
}
