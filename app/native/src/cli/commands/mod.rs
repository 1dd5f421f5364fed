//! CLI command definitions using Clap.
//!
//! - `catalog` - Catalog inspection and clearing
//! - `config_cmd` - Configuration file management

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

use crate::config::{ConfigSource, RedwallConfig};
use crate::daemon;
use crate::error::RedwallError;

pub mod catalog;
pub mod config_cmd;

pub use catalog::CatalogCommands;
pub use config_cmd::ConfigCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Redwall - keeps a local catalog of subreddit wallpapers and rotates the desktop background.
#[derive(Parser, Debug)]
#[command(name = "redwall")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true, args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Run the catalog updater and the wallpaper rotator until interrupted.
    #[arg(long, conflicts_with = "clear_catalog")]
    pub start: bool,

    /// Delete the catalog directory and the catalog index, then exit.
    #[arg(long)]
    pub clear_catalog: bool,

    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Catalog inspection commands.
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Configuration file management commands.
    ///
    /// Initialize and locate the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    Schema,
}

impl Cli {
    /// Builds the configuration source from `--config`, if given.
    #[must_use]
    pub fn config_source(&self) -> ConfigSource {
        self.config.as_ref().map_or_else(ConfigSource::new, |path| ConfigSource::with_path(path))
    }

    /// Like [`Self::config_source`], but a `--config` path must exist.
    fn checked_config_source(&self) -> Result<ConfigSource, RedwallError> {
        if let Some(path) = self.config.as_ref().filter(|path| !path.exists()) {
            return Err(RedwallError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        Ok(self.config_source())
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), RedwallError> {
        match &self.command {
            Some(Commands::Config(cmd)) => config_cmd::execute(cmd),
            Some(Commands::Catalog(cmd)) => catalog::execute(cmd, &self.checked_config_source()?),
            Some(Commands::Schema) => {
                let schema = schemars::schema_for!(RedwallConfig);
                println!("{}", serde_json::to_string_pretty(&schema)?);
                Ok(())
            }
            None if self.clear_catalog => catalog::clear(&self.checked_config_source()?),
            None if self.start => daemon::start(&self.checked_config_source()?),
            None => {
                Self::command().print_help()?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // CLI parsing tests
    // ========================================================================

    #[test]
    fn test_cli_definition_is_valid() { Cli::command().debug_assert(); }

    #[test]
    fn test_cli_parses_no_arguments() {
        let cli = Cli::try_parse_from(["redwall"]).unwrap();
        assert!(!cli.start);
        assert!(!cli.clear_catalog);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parses_start() {
        let cli = Cli::try_parse_from(["redwall", "--start"]).unwrap();
        assert!(cli.start);
    }

    #[test]
    fn test_cli_parses_clear_catalog() {
        let cli = Cli::try_parse_from(["redwall", "--clear-catalog"]).unwrap();
        assert!(cli.clear_catalog);
    }

    #[test]
    fn test_cli_start_conflicts_with_clear() {
        assert!(Cli::try_parse_from(["redwall", "--start", "--clear-catalog"]).is_err());
    }

    #[test]
    fn test_cli_start_conflicts_with_subcommand() {
        assert!(Cli::try_parse_from(["redwall", "--start", "schema"]).is_err());
    }

    #[test]
    fn test_cli_parses_global_config() {
        let cli = Cli::try_parse_from(["redwall", "catalog", "list", "--config", "/tmp/c.json"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
        assert!(matches!(cli.command, Some(Commands::Catalog(CatalogCommands::List))));
        assert_eq!(cli.config_source().custom_path(), Some(PathBuf::from("/tmp/c.json").as_path()));
    }

    #[test]
    fn test_cli_parses_config_init() {
        let cli =
            Cli::try_parse_from(["redwall", "config", "init", "--force", "--path", "/tmp/x.jsonc"])
                .unwrap();
        match cli.command {
            Some(Commands::Config(ConfigCommands::Init { force, path, stdout })) => {
                assert!(force);
                assert!(!stdout);
                assert_eq!(path, Some(PathBuf::from("/tmp/x.jsonc")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_schema() {
        let cli = Cli::try_parse_from(["redwall", "schema"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Schema)));
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["redwall", "--bogus"]).is_err());
    }

    #[test]
    fn test_missing_custom_config_is_reported() {
        let cli = Cli::try_parse_from(["redwall", "--clear-catalog", "--config", "/nonexistent/c.json"])
            .unwrap();
        let err = cli.execute().unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
