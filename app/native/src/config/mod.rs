//! Configuration module for Redwall.
//!
//! Configuration is an explicit value: [`ConfigSource::load`] returns an
//! immutable [`RedwallConfig`] snapshot, and the long-running loops call
//! [`ConfigSource::refresh`] to pick up edits between cycles.
//!
//! The configuration file supports JSONC format (JSON with comments).

pub mod template;
pub mod types;

use std::path::{Path, PathBuf};

pub use types::{
    CatalogSource, ConfigError, RedwallConfig, ScreenOverride, config_paths, load_config,
    load_config_from_path, preferred_config_path, resolve_path,
};

/// Knows where the configuration comes from and produces snapshots of it.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    /// Path given with `--config`, bypassing the search paths.
    custom_path: Option<PathBuf>,
}

impl ConfigSource {
    /// Uses the default search paths.
    #[must_use]
    pub const fn new() -> Self { Self { custom_path: None } }

    /// Uses a specific file instead of the default search paths.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self { Self { custom_path: Some(path.into()) } }

    /// Returns the custom path, if one was given.
    #[must_use]
    pub fn custom_path(&self) -> Option<&Path> { self.custom_path.as_deref() }

    /// Loads a configuration snapshot.
    ///
    /// With a custom path, that file must exist. Otherwise the search paths
    /// are tried in order; if none exists, the documented template is written
    /// to the preferred location and loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read, parsed, or validated,
    /// or if a custom path does not exist.
    pub fn load(&self) -> Result<(RedwallConfig, Option<PathBuf>), ConfigError> {
        if let Some(path) = &self.custom_path {
            let config = load_config_from_path(path)?;
            return Ok((config, Some(path.clone())));
        }

        match load_config() {
            Ok((config, path)) => Ok((config, Some(path))),
            Err(ConfigError::NotFound) => Ok(load_from_template()),
            Err(err) => Err(err),
        }
    }

    /// Loads a fresh snapshot, keeping `previous` if loading fails.
    #[must_use]
    pub fn refresh(&self, previous: &RedwallConfig) -> RedwallConfig {
        match self.load() {
            Ok((config, _)) => config,
            Err(err) => {
                tracing::warn!(error = %err, "failed to reload configuration, keeping previous");
                previous.clone()
            }
        }
    }
}

/// Writes the template to the preferred location and loads it.
///
/// Falls back to the built-in defaults if the template cannot be written.
fn load_from_template() -> (RedwallConfig, Option<PathBuf>) {
    let path = preferred_config_path();

    if let Err(err) = template::create_config_file(&path) {
        tracing::warn!(
            error = %err,
            path = %path.display(),
            "failed to create configuration file, using defaults"
        );
        return (RedwallConfig::default(), None);
    }

    tracing::info!(path = %path.display(), "created default configuration file");

    match load_config_from_path(&path) {
        Ok(config) => (config, Some(path)),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration template, using defaults");
            (RedwallConfig::default(), None)
        }
    }
}
