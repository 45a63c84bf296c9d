//! # procwrap Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This file serves as the main entry point for the `procwrap` CLI.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the subcommand handlers in `procwrap::commands`
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! procwrap --help
//!
//! # Run a command with lifecycle logging
//! procwrap -vv run -- echo hello
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Route to the appropriate command handler
//! 4. Print any error and exit with the matching status
//!
use clap::Parser;
use procwrap::commands;
use tracing_subscriber::{fmt, EnvFilter};

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "procwrap",
    about = "Run external programs with managed lifecycle and deadlock-free output capture",
    long_about = "Start, wait for, check and terminate external programs.\n\
                  Output is captured through scratch files (or concurrently drained pipes),\n\
                  commands are never passed through a shell.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// All available subcommands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "r")]
    Run(commands::run::RunArgs),
    #[command(alias = "c")]
    Check(commands::check::CheckArgs),
    #[command(alias = "i")]
    Installed(commands::installed::InstalledArgs),
    #[command(alias = "w")]
    With(commands::with::WithArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Run(args) => commands::run::handle_run(args).await,
        Commands::Check(args) => commands::check::handle_check(args).await,
        Commands::Installed(args) => commands::installed::handle_installed(args).await,
        Commands::With(args) => commands::with::handle_with(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(commands::exit_status_for(&e));
    }

    Ok(())
}
