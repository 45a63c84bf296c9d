//! # Output Capture (`common::process::sink`)
//!
//! File: cli/src/common/process/sink.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Decides where a child's stdout/stderr go while it runs, and collects them
//! once it exits. Capturing through pipes while the parent blocks in `wait()`
//! deadlocks as soon as the child fills a pipe's kernel buffer, so there are
//! two strategies:
//!
//! - **File** (default): both streams are redirected into two scratch files.
//!   The child never blocks on the parent, and the files are read back after
//!   exit and removed when the sink is dropped.
//! - **Pipe**: both streams go to OS pipes. `collect` drains them on two reader
//!   threads *while* waiting for the exit, and joins both readers before
//!   returning. Reading the pipes one after the other is never done.
//!
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::process::{Child, ExitStatus, Stdio};
use std::str::FromStr;
use std::thread;
use tempfile::NamedTempFile;
use tracing::debug;

/// Output capture strategy selected per `ProcessHandle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptureMode {
    /// Scratch files read back after exit.
    #[default]
    File,
    /// OS pipes drained concurrently with the wait.
    Pipe,
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureMode::File => f.write_str("file"),
            CaptureMode::Pipe => f.write_str("pipe"),
        }
    }
}

impl FromStr for CaptureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" | "files" => Ok(CaptureMode::File),
            "pipe" | "pipes" => Ok(CaptureMode::Pipe),
            other => Err(format!("unknown capture mode '{}' (expected file or pipe)", other)),
        }
    }
}

/// Raw result of a finished child: exit status plus the bytes of both streams.
#[derive(Debug)]
pub(crate) struct Collected {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Live capture resources for one child, created at start, consumed at wait.
#[derive(Debug)]
pub(crate) enum OutputSink {
    File {
        stdout: NamedTempFile,
        stderr: NamedTempFile,
    },
    Pipe,
}

impl OutputSink {
    /// Allocates the resources for `mode`.
    pub fn new(mode: CaptureMode) -> io::Result<Self> {
        match mode {
            CaptureMode::File => {
                let stdout = tempfile::Builder::new().prefix("stdout").tempfile()?;
                let stderr = tempfile::Builder::new().prefix("stderr").tempfile()?;
                debug!(
                    "capturing into {} and {}",
                    stdout.path().display(),
                    stderr.path().display()
                );
                Ok(OutputSink::File { stdout, stderr })
            }
            CaptureMode::Pipe => Ok(OutputSink::Pipe),
        }
    }

    /// Returns the `(stdout, stderr)` destinations to hand to the child.
    pub fn stdio(&self) -> io::Result<(Stdio, Stdio)> {
        match self {
            OutputSink::File { stdout, stderr } => Ok((
                Stdio::from(stdout.reopen()?),
                Stdio::from(stderr.reopen()?),
            )),
            OutputSink::Pipe => Ok((Stdio::piped(), Stdio::piped())),
        }
    }

    /// Blocks until `child` exits and gathers both streams, releasing the sink.
    pub fn collect(self, child: &mut Child) -> io::Result<Collected> {
        match self {
            OutputSink::File {
                mut stdout,
                mut stderr,
            } => {
                let status = child.wait()?;
                let stdout = read_back(&mut stdout)?;
                let stderr = read_back(&mut stderr)?;
                Ok(Collected {
                    status,
                    stdout,
                    stderr,
                })
            }
            OutputSink::Pipe => collect_pipes(child),
        }
    }
}

fn read_back(file: &mut NamedTempFile) -> io::Result<Vec<u8>> {
    let file = file.as_file_mut();
    file.seek(SeekFrom::Start(0))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

fn collect_pipes(child: &mut Child) -> io::Result<Collected> {
    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let status = child.wait();

    // Join both readers even when the wait failed, so no thread outlives us.
    let stdout = join_reader(stdout_reader);
    let stderr = join_reader(stderr_reader);

    Ok(Collected {
        status: status?,
        stdout: stdout?,
        stderr: stderr?,
    })
}

fn spawn_reader<R>(mut stream: R) -> thread::JoinHandle<io::Result<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_reader(reader: Option<thread::JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    match reader {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output reader thread panicked"))?,
        None => Ok(Vec::new()),
    }
}

/// Decodes captured bytes and strips exactly one trailing `\n`, if present.
pub(crate) fn normalize(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    match text.strip_suffix('\n') {
        Some(stripped) => stripped.to_string(),
        None => text.into_owned(),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_single_newline() {
        assert_eq!(normalize(b"hello\n"), "hello");
        assert_eq!(normalize(b"hello\n\n"), "hello\n");
        assert_eq!(normalize(b"hello"), "hello");
        assert_eq!(normalize(b"hello \t"), "hello \t");
        assert_eq!(normalize(b"a\r\n"), "a\r");
        assert_eq!(normalize(b""), "");
    }

    #[test]
    fn test_capture_mode_parsing() {
        assert_eq!("file".parse::<CaptureMode>().unwrap(), CaptureMode::File);
        assert_eq!("PIPE".parse::<CaptureMode>().unwrap(), CaptureMode::Pipe);
        assert!("socket".parse::<CaptureMode>().is_err());
        assert_eq!(CaptureMode::default(), CaptureMode::File);
        assert_eq!(CaptureMode::Pipe.to_string(), "pipe");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_sink_collects_both_streams() {
        let sink = OutputSink::new(CaptureMode::File).unwrap();
        let (out, err) = sink.stdio().unwrap();
        let mut child = std::process::Command::new("sh")
            .args(["-c", "echo out; echo err 1>&2"])
            .stdout(out)
            .stderr(err)
            .spawn()
            .unwrap();
        let collected = sink.collect(&mut child).unwrap();
        assert!(collected.status.success());
        assert_eq!(collected.stdout, b"out\n");
        assert_eq!(collected.stderr, b"err\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_sink_removes_scratch_files() {
        let sink = OutputSink::new(CaptureMode::File).unwrap();
        let paths = match &sink {
            OutputSink::File { stdout, stderr } => {
                (stdout.path().to_path_buf(), stderr.path().to_path_buf())
            }
            OutputSink::Pipe => unreachable!(),
        };
        assert!(paths.0.exists() && paths.1.exists());
        let (out, err) = sink.stdio().unwrap();
        let mut child = std::process::Command::new("true")
            .stdout(out)
            .stderr(err)
            .spawn()
            .unwrap();
        sink.collect(&mut child).unwrap();
        assert!(!paths.0.exists());
        assert!(!paths.1.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_sink_drains_concurrently() {
        // Far beyond any pipe buffer on both streams at once.
        let script = "head -c 3000000 /dev/zero | tr '\\0' x; head -c 3000000 /dev/zero | tr '\\0' y 1>&2";
        let sink = OutputSink::new(CaptureMode::Pipe).unwrap();
        let (out, err) = sink.stdio().unwrap();
        let mut child = std::process::Command::new("sh")
            .args(["-c", script])
            .stdout(out)
            .stderr(err)
            .spawn()
            .unwrap();
        let collected = sink.collect(&mut child).unwrap();
        assert!(collected.status.success());
        assert_eq!(collected.stdout.len(), 3_000_000);
        assert_eq!(collected.stderr.len(), 3_000_000);
        assert!(collected.stdout.iter().all(|&b| b == b'x'));
        assert!(collected.stderr.iter().all(|&b| b == b'y'));
    }
}
