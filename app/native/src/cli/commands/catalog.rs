//! Catalog CLI commands.

use std::path::Path;

use clap::Subcommand;
use colored::Colorize;

use crate::catalog::{self, Catalog};
use crate::config::ConfigSource;
use crate::error::RedwallError;
use crate::paths;

/// Catalog subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum CatalogCommands {
    /// List catalogued wallpapers.
    ///
    /// Prints a JSON array of the entries that currently exist and decode.
    List,

    /// Show where the catalog and its index are stored.
    Path,
}

/// Execute catalog subcommands.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn execute(cmd: &CatalogCommands, source: &ConfigSource) -> Result<(), RedwallError> {
    let (config, _) = source.load()?;

    match cmd {
        CatalogCommands::List => {
            let catalog = Catalog::open(
                config.catalog_dir(),
                config.catalog_source,
                paths::default_index_path(),
            );
            let entries = catalog.snapshot();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        CatalogCommands::Path => {
            println!("{}", config.catalog_dir().display());
            println!("{}", paths::default_index_path().display());
        }
    }

    Ok(())
}

/// What `--clear-catalog` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Neither the catalog directory nor the index existed.
    NothingToClear,
    /// Storage was removed; `leftovers` is set if some of it survived.
    Cleared { freed: u64, leftovers: bool },
}

/// Deletes the catalog directory and the index file.
///
/// Removal failures are logged, not returned.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn clear(source: &ConfigSource) -> Result<(), RedwallError> {
    match clear_with_index(source, &paths::default_index_path())? {
        ClearOutcome::NothingToClear => println!("Catalog does not exist. Nothing to clear."),
        ClearOutcome::Cleared { freed, leftovers } => {
            println!("Catalog cleared. Freed {}.", paths::format_bytes(freed).green());
            if leftovers {
                println!("{}", "Some catalog files could not be removed.".yellow());
            }
        }
    }

    Ok(())
}

fn clear_with_index(source: &ConfigSource, index: &Path) -> Result<ClearOutcome, RedwallError> {
    let (config, _) = source.load()?;
    let dir = config.catalog_dir();

    if !dir.exists() && !index.exists() {
        return Ok(ClearOutcome::NothingToClear);
    }

    let freed = catalog::clear_storage(&dir, index);
    Ok(ClearOutcome::Cleared { freed, leftovers: dir.exists() || index.exists() })
}
