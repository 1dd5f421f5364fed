//! CLI module for Redwall.
//!
//! `--start` runs the long-lived updater and rotator; everything else is a
//! one-shot command that exits when done.

mod commands;

use clap::Parser;
pub use commands::Cli;

use crate::error::RedwallError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), RedwallError> {
    let cli = Cli::parse();
    cli.execute()
}
