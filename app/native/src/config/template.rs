//! Configuration template generation.
//!
//! The template is a working configuration: every option is set to its
//! default value and documented with comments. It is written on first run
//! when no configuration file exists, and by `redwall config init`.

use std::fs;
use std::path::Path;

/// Generates the documented configuration template.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// Redwall Configuration File
// ==========================
// This file uses JSONC format (JSON with comments).
// Every option is shown with its default value.

{
  // Subreddits to pull wallpapers from
  "subreddit_list": ["wallpaper", "wallpapers"],

  // Number of top posts taken from each subreddit per update
  "number_of_top_posts": 10,

  // Directory holding downloaded wallpapers
  // Relative paths are resolved against the working directory, "~" is expanded
  "catalog_path": "catalog",

  // Where catalog entries are read from: "index" (persisted list) or "directory"
  "catalog_source": "index",

  // Apply a copy resized to the monitor width instead of the original
  "downscale": false,

  // Seconds between catalog updates
  "catalog_update_interval": 3600,

  // Seconds between wallpaper changes
  "wallpaper_change_interval": 600,

  // Host serving the /r/<name>.json listings
  "feed_host": "www.reddit.com",

  // Keep posts flagged as NSFW
  "allow_nsfw": false,

  // Reject images taller than they are wide
  "reject_portrait": true,

  // Mix posts from all subreddits before filtering
  "shuffle_feeds": true,

  // Seconds before a feed request or download is abandoned
  "request_timeout": 30

  // Monitor resolution, detected automatically when omitted
  // "screen": { "width": 2560, "height": 1440 }
}
"#
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
