//! # procwrap Alias Configuration
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads the user's command alias table. An alias maps a logical
//! command name (argument[0] as typed by the caller) to a concrete executable,
//! for example pointing `python` at a virtualenv interpreter. The table is
//! consulted exactly once per `Command` construction.
//!
//! ## Architecture
//!
//! - The file is TOML with a single `[aliases]` table of string values.
//! - Alias targets are tilde-expanded (`~` to the home directory).
//! - The table is loaded lazily on first use into a process-wide `OnceCell`
//!   and never mutated afterwards, so lookups need no locking.
//! - Resolution is best-effort: a missing file yields an empty table, and an
//!   unreadable or malformed file is logged with `warn!` and ignored.
//!
//! Configuration file location (first match wins):
//! 1. The path in the `PROCWRAP_CONFIG` environment variable
//! 2. User-specific `config.toml` in the platform config dir (`~/.config/procwrap/` on Linux)
//! 3. Legacy `~/.procwrap.toml`
//!
//! ## Examples
//!
//! ```toml
//! [aliases]
//! python = "~/venvs/tools/bin/python"
//! convert = "/opt/imagemagick/bin/convert"
//! ```
//!
//! ```rust,no_run
//! if let Some(target) = procwrap::core::config::resolve_alias("python") {
//!     println!("python runs as {}", target);
//! }
//! ```
//!
use crate::core::error::Result;
use anyhow::Context;
use directories::ProjectDirs;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::HashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "PROCWRAP_CONFIG";
const LEGACY_CONFIG_FILENAME: &str = ".procwrap.toml";

/// Represents the configuration file contents.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Command name -> replacement executable.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

/// Read-only alias lookup table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    /// Builds a table from raw entries, expanding `~` in every target.
    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(name, target)| {
                let expanded = shellexpand::tilde(&target).into_owned();
                debug!("Alias entry: {} -> {}", name, expanded);
                (name, expanded)
            })
            .collect();
        Self { entries }
    }

    /// Returns the replacement executable for `name`, if configured.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static ALIASES: OnceCell<AliasTable> = OnceCell::new();

/// Returns the process-wide alias table, loading it on first call.
pub fn aliases() -> &'static AliasTable {
    ALIASES.get_or_init(load_user_aliases)
}

/// Looks up `name` in the process-wide alias table.
///
/// This is the alias collaborator consulted by `Command` construction. An
/// absent mapping (or an absent configuration file) simply yields `None`.
pub fn resolve_alias(name: &str) -> Option<String> {
    aliases().get(name).map(str::to_owned)
}

/// Loads and parses an alias table from an explicit path.
///
/// Unlike the lazily loaded global table, errors are returned to the caller.
pub fn load_aliases_from_path(path: &Path) -> Result<AliasTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;
    Ok(AliasTable::from_entries(config.aliases))
}

fn load_user_aliases() -> AliasTable {
    let Some(path) = find_config_path() else {
        debug!("No alias configuration file found.");
        return AliasTable::default();
    };
    info!("Loading alias configuration from: {}", path.display());
    match load_aliases_from_path(&path) {
        Ok(table) => {
            debug!("Loaded {} alias(es).", table.len());
            table
        }
        Err(e) => {
            warn!("Ignoring alias configuration: {:#}", e);
            AliasTable::default()
        }
    }
}

fn find_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
        let path = PathBuf::from(explicit);
        if path.is_file() {
            return Some(path);
        }
        warn!(
            "{} points to '{}', which is not a file.",
            CONFIG_ENV_VAR,
            path.display()
        );
        return None;
    }
    candidate_paths().into_iter().find(|p| p.is_file())
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(proj_dirs) = ProjectDirs::from("com", "Procwrap", "procwrap") {
        candidates.push(proj_dirs.config_dir().join("config.toml"));
    } else {
        warn!("Could not determine user config directory.");
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(LEGACY_CONFIG_FILENAME));
    }
    candidates
}
