//! Configuration types for Redwall.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Keys are `snake_case`; the legacy `*_timeout` spellings of the interval
//! keys are accepted as aliases.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{APP_NAME, DEFAULT_FEED_HOST};

/// Where the catalog's list of entries comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// A persisted JSON list of absolute paths, rewritten after every addition.
    #[default]
    Index,
    /// The live listing of the catalog directory.
    Directory,
}

/// Explicit monitor resolution, used instead of probing the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScreenOverride {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RedwallConfig {
    /// Subreddits to pull wallpapers from, in order.
    pub subreddit_list: Vec<String>,

    /// Maximum number of posts taken from each subreddit per update.
    pub number_of_top_posts: usize,

    /// Directory holding downloaded wallpapers.
    /// Relative paths are resolved against the working directory; `~` is expanded.
    pub catalog_path: String,

    /// Apply a copy resized to the monitor width instead of the original.
    pub downscale: bool,

    /// Seconds between catalog updates.
    #[serde(alias = "catalog_update_timeout")]
    pub catalog_update_interval: u64,

    /// Seconds between wallpaper changes.
    #[serde(alias = "wallpaper_change_timeout")]
    pub wallpaper_change_interval: u64,

    /// Host serving the `/r/<name>.json` listings.
    pub feed_host: String,

    /// Keep posts flagged as NSFW.
    pub allow_nsfw: bool,

    /// Reject images taller than they are wide.
    pub reject_portrait: bool,

    /// Mix posts from all subreddits before filtering, instead of going feed by feed.
    pub shuffle_feeds: bool,

    /// Where the catalog entries are read from: "index" or "directory".
    pub catalog_source: CatalogSource,

    /// Seconds before a feed request or download is abandoned.
    pub request_timeout: u64,

    /// Monitor resolution override. Detected automatically when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen: Option<ScreenOverride>,
}

impl Default for RedwallConfig {
    fn default() -> Self {
        Self {
            subreddit_list: vec!["wallpaper".to_string(), "wallpapers".to_string()],
            number_of_top_posts: 10,
            catalog_path: "catalog".to_string(),
            downscale: false,
            catalog_update_interval: 3600,
            wallpaper_change_interval: 600,
            feed_host: DEFAULT_FEED_HOST.to_string(),
            allow_nsfw: false,
            reject_portrait: true,
            shuffle_feeds: true,
            catalog_source: CatalogSource::Index,
            request_timeout: 30,
            screen: None,
        }
    }
}

impl RedwallConfig {
    /// Interval between catalog updates.
    #[must_use]
    pub const fn update_interval(&self) -> Duration { Duration::from_secs(self.catalog_update_interval) }

    /// Interval between wallpaper changes.
    #[must_use]
    pub const fn rotation_interval(&self) -> Duration {
        Duration::from_secs(self.wallpaper_change_interval)
    }

    /// Timeout applied to each HTTP request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout) }

    /// Resolves `catalog_path` to an absolute directory.
    #[must_use]
    pub fn catalog_dir(&self) -> PathBuf {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        resolve_path(&self.catalog_path, &base)
    }

    /// Checks values that would make the loops misbehave.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_path.trim().is_empty() {
            return Err(ConfigError::Invalid("catalog_path must not be empty".to_string()));
        }
        if self.catalog_update_interval == 0 {
            return Err(ConfigError::Invalid(
                "catalog_update_interval must be greater than 0".to_string(),
            ));
        }
        if self.wallpaper_change_interval == 0 {
            return Err(ConfigError::Invalid(
                "wallpaper_change_interval must be greater than 0".to_string(),
            ));
        }
        if self.feed_host.trim().is_empty() {
            return Err(ConfigError::Invalid("feed_host must not be empty".to_string()));
        }
        if self.request_timeout == 0 {
            return Err(ConfigError::Invalid("request_timeout must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Expands `~` and resolves relative paths against `base_dir`.
#[must_use]
pub fn resolve_path(path: &str, base_dir: &Path) -> PathBuf {
    let path = path.trim();
    if path.is_empty() {
        return PathBuf::new();
    }

    let expanded = PathBuf::from(shellexpand::tilde(path).as_ref());
    if expanded.is_absolute() { expanded } else { base_dir.join(expanded) }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file was found.
    NotFound,
    /// Failed to read the configuration file.
    IoError(std::io::Error),
    /// Failed to parse the configuration file.
    ParseError(serde_json::Error),
    /// The file parsed but holds an unusable value.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "No configuration file found. Run `{APP_NAME} config init` to create one."
            ),
            Self::IoError(err) => write!(f, "Failed to read configuration file: {err}"),
            Self::ParseError(err) => write!(f, "Failed to parse configuration file: {err}"),
            Self::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
            Self::NotFound | Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err) }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self { Self::ParseError(err) }
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `./config.json` in the working directory
/// 2. `$XDG_CONFIG_HOME/redwall/config.jsonc` or `config.json`, if set
/// 3. `~/.config/redwall/config.jsonc` or `config.json`
/// 4. The platform config directory (`~/Library/Application Support/redwall` on macOS)
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config.json"));
    }

    let mut push_dir = |dir: PathBuf| {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    };

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        push_dir(PathBuf::from(xdg_config).join(APP_NAME));
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(home.join(".config").join(APP_NAME));
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(config_dir.join(APP_NAME));
    }

    paths
}

/// Returns the location a new configuration file should be written to.
///
/// This is the first per-user path, skipping the working-directory entry.
#[must_use]
pub fn preferred_config_path() -> PathBuf {
    config_paths()
        .into_iter()
        .find(|path| path.file_name().is_some_and(|name| name == "config.jsonc"))
        .unwrap_or_else(|| PathBuf::from("config.jsonc"))
}

/// Loads and validates configuration from a specific file.
///
/// Both single-line (`//`) and multi-line (`/* */`) comments are stripped
/// before parsing.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist,
/// `ConfigError::IoError` / `ConfigError::ParseError` on read or parse
/// failures, and `ConfigError::Invalid` if validation fails.
pub fn load_config_from_path(path: &Path) -> Result<RedwallConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: RedwallConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations, or the error from [`load_config_from_path`].
pub fn load_config() -> Result<(RedwallConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            let config = load_config_from_path(&path)?;
            return Ok((config, path));
        }
    }

    Err(ConfigError::NotFound)
}
