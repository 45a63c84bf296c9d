//! # Command Construction (`common::process::command`)
//!
//! File: cli/src/common/process/command.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Normalizes caller input into the argument vector handed to the OS. A command
//! arrives either as a pre-split vector (`["ls", "-l"]`) or as a single string
//! (`"ls -l 'my dir'"`). Strings are tokenized with POSIX shell lexing
//! (whitespace splitting, quotes, backslash escapes) via `shell-words`; no
//! variable expansion, globbing, pipes or redirection ever happen.
//!
//! After tokenizing, argument[0] is looked up in the alias table
//! (`core::config::resolve_alias`) and replaced when a mapping exists.
//!
use crate::core::config;
use crate::core::error::{ProcResult, ProcessError};
use std::fmt;
use tracing::debug;

/// Raw command input as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandInput {
    /// Already split into discrete arguments; used verbatim.
    Vector(Vec<String>),
    /// A shell-syntax string, tokenized but never interpreted.
    Shell(String),
}

impl fmt::Display for CommandInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandInput::Vector(args) => write!(f, "{:?}", args),
            CommandInput::Shell(line) => write!(f, "{:?}", line),
        }
    }
}

impl From<&str> for CommandInput {
    fn from(line: &str) -> Self {
        CommandInput::Shell(line.to_string())
    }
}

impl From<String> for CommandInput {
    fn from(line: String) -> Self {
        CommandInput::Shell(line)
    }
}

impl From<Vec<String>> for CommandInput {
    fn from(args: Vec<String>) -> Self {
        CommandInput::Vector(args)
    }
}

impl From<Vec<&str>> for CommandInput {
    fn from(args: Vec<&str>) -> Self {
        CommandInput::Vector(args.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for CommandInput {
    fn from(args: &[&str]) -> Self {
        CommandInput::Vector(args.iter().map(|a| a.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for CommandInput {
    fn from(args: [&str; N]) -> Self {
        CommandInput::Vector(args.iter().map(|a| a.to_string()).collect())
    }
}

/// A resolved, non-empty argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    input: CommandInput,
    args: Vec<String>,
    display: String,
    alias: Option<String>,
}

impl Command {
    /// Parses `input` and resolves argument[0] against the user's alias table.
    pub fn new(input: impl Into<CommandInput>) -> ProcResult<Self> {
        Self::with_resolver(input, config::resolve_alias)
    }

    /// Parses `input`, consulting `resolve` once with argument[0].
    ///
    /// # Errors
    ///
    /// `ProcessError::InvalidCommand` when the input holds no arguments or a
    /// shell string cannot be tokenized (unbalanced quotes, trailing escape).
    pub fn with_resolver<F>(input: impl Into<CommandInput>, resolve: F) -> ProcResult<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let input = input.into();
        let (mut args, shown) = match &input {
            CommandInput::Vector(args) => (args.clone(), args.join(" ")),
            CommandInput::Shell(line) => {
                let args = shell_words::split(line).map_err(|e| ProcessError::InvalidCommand {
                    reason: format!("cannot tokenize {:?}: {}", line, e),
                })?;
                (args, line.clone())
            }
        };
        debug!("command: {:?} ({})", args, shown);

        let Some(program) = args.first_mut() else {
            return Err(ProcessError::InvalidCommand {
                reason: "empty command!".to_string(),
            });
        };

        let alias = resolve(program.as_str());
        if let Some(target) = &alias {
            debug!("alias found: {} -> {}", program, target);
            *program = target.clone();
        }

        Ok(Self {
            input,
            args,
            display: shown,
            alias,
        })
    }

    /// The executable (argument[0], after alias substitution).
    pub fn program(&self) -> &str {
        &self.args[0]
    }

    /// The full argument vector, including the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Human-readable form: the original string, or the vector joined by spaces.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The input exactly as the caller supplied it.
    pub fn input(&self) -> &CommandInput {
        &self.input
    }

    /// The alias target substituted for argument[0], if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Builds the `std::process::Command` for spawning, without any shell.
    pub(crate) fn to_std(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.args[0]);
        cmd.args(&self.args[1..]);
        cmd
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}
