//! # procwrap Installed Command
//!
//! File: cli/src/commands/installed.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `procwrap installed`: find out whether a program can be spawned
//! at all. The command is run to completion (typically with a harmless flag
//! such as `--version`); its exit code is irrelevant. Only a spawn failure is
//! reported, together with a remediation message: the homepage and, on a known
//! Linux distribution, the package-manager command to install it.
//!
//! ```bash
//! procwrap installed --homepage https://www.x.org --package xvfb -- Xvfb -help
//! ```
//!
use super::{blocking, TargetArgs};
use crate::core::error::Result;
use clap::Parser;
use tracing::{debug, info};

/// Arguments for the `installed` subcommand.
#[derive(Parser, Debug)]
#[command(about = "Check that a program is installed (can be started)")]
pub struct InstalledArgs {
    /// Project homepage mentioned when the program is missing.
    #[arg(long)]
    pub homepage: Option<String>,

    /// Distribution package that provides the program.
    #[arg(long)]
    pub package: Option<String>,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Handler for `procwrap installed`.
pub async fn handle_installed(args: InstalledArgs) -> Result<()> {
    info!("Handling installed command...");
    debug!("Installed args: {:?}", args);

    let mut handle = args.target.build_handle()?;
    if let Some(url) = args.homepage {
        handle = handle.with_homepage(url);
    }
    if let Some(package) = args.package {
        handle = handle.with_install_hint(package);
    }

    let handle = blocking(move || {
        handle.check_installed()?;
        Ok(handle)
    })
    .await?;

    println!("'{}' is installed.", handle.command().program());
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProcessError;

    #[test]
    fn test_installed_args_parsing() {
        let args = InstalledArgs::try_parse_from([
            "installed",
            "--homepage",
            "https://example.org",
            "--package",
            "example",
            "--",
            "example-bin",
        ])
        .unwrap();
        assert_eq!(args.homepage.as_deref(), Some("https://example.org"));
        assert_eq!(args.package.as_deref(), Some("example"));
        assert_eq!(args.target.argv, vec!["example-bin"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_handle_installed() {
        // A non-zero exit still counts as installed.
        let present = InstalledArgs::try_parse_from(["installed", "--", "false"]).unwrap();
        assert!(handle_installed(present).await.is_ok());

        let missing = InstalledArgs::try_parse_from([
            "installed",
            "--homepage",
            "https://example.org",
            "--",
            "nonexistent-binary-xyz",
        ])
        .unwrap();
        let err = handle_installed(missing).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProcessError>(),
            Some(ProcessError::NotInstalled { .. })
        ));
        assert!(err.to_string().contains("home page: https://example.org"));
    }
}
