//! Config CLI commands.
//!
//! Commands for managing the Redwall configuration file.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use colored::Colorize;

use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{config_paths, preferred_config_path};
use crate::error::RedwallError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// Creates a configuration file at the default location holding every
    /// option at its default value, each with a short description.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  redwall config init              # Create config at default location
  redwall config init --force      # Overwrite existing config
  redwall config init --path ~/my-config.jsonc  # Create at custom path
  redwall config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses ~/.config/redwall/config.jsonc
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show the path to the configuration file.
    ///
    /// Lists the locations searched for a configuration file and marks the
    /// one in use.
    Path,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), RedwallError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                println!("{}", generate_config_template());
                Ok(())
            } else {
                let path = path.clone().unwrap_or_else(preferred_config_path);
                init_config(&path, *force)?;
                println!("Configuration file created at: {}", path.display().to_string().bold());
                Ok(())
            }
        }
        ConfigCommands::Path => {
            show_config_paths();
            Ok(())
        }
    }
}

/// Writes the template to `path`, refusing to overwrite unless `force`.
fn init_config(path: &Path, force: bool) -> Result<(), RedwallError> {
    if path.exists() && !force {
        return Err(RedwallError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            path.display()
        )));
    }

    create_config_file(path).map_err(|e| {
        RedwallError::ConfigError(format!("Failed to create config file {}: {e}", path.display()))
    })
}

fn show_config_paths() {
    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;

    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)".green().to_string()
        } else if exists {
            " (exists)".dimmed().to_string()
        } else {
            String::new()
        };

        println!("  {}. {}{marker}", i + 1, path.display());
    }

    if !found_config {
        println!("\n{}", "No configuration file found.".yellow());
        println!("Run 'redwall config init' to create one.");
    }
}
