//! Applying an image as the desktop background.
//!
//! [`WallpaperSetter`] is the seam between the rotator and the platform. On
//! GNOME the background is set through `gsettings` with a `file://` URI;
//! everywhere else the `wallpaper` crate applies it natively in fit mode.

mod gnome;
mod native;

use std::path::{Path, PathBuf};

pub use gnome::GnomeSetter;
pub use native::NativeSetter;

use crate::config::RedwallConfig;
use crate::imaging;
use crate::screen::ScreenSize;

/// Errors that can occur when setting the wallpaper.
#[derive(Debug)]
pub enum WallpaperError {
    /// The wallpaper file does not exist.
    FileNotFound(String),
    /// The downscaled variant could not be produced.
    Variant(String),
    /// Failed to set the wallpaper.
    SetWallpaperFailed(String),
}

impl std::fmt::Display for WallpaperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "Wallpaper file not found: {path}"),
            Self::Variant(msg) => write!(f, "Failed to prepare wallpaper variant: {msg}"),
            Self::SetWallpaperFailed(msg) => write!(f, "Failed to set wallpaper: {msg}"),
        }
    }
}

impl std::error::Error for WallpaperError {}

/// Something that can make an image file the desktop background.
pub trait WallpaperSetter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Applies `path` as the wallpaper.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the change.
    fn set(&self, path: &Path) -> Result<(), WallpaperError>;
}

/// Picks the setter for the running desktop.
#[must_use]
pub fn detect_setter() -> Box<dyn WallpaperSetter> {
    if is_gnome_desktop() {
        tracing::debug!("using gsettings wallpaper setter");
        Box::new(GnomeSetter)
    } else {
        tracing::debug!("using native wallpaper setter");
        Box::new(NativeSetter)
    }
}

#[cfg(target_os = "linux")]
fn is_gnome_desktop() -> bool {
    ["XDG_CURRENT_DESKTOP", "XDG_SESSION_DESKTOP", "DESKTOP_SESSION"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .any(|value| desktop_is_gnome(&value))
}

#[cfg(not(target_os = "linux"))]
const fn is_gnome_desktop() -> bool { false }

/// `XDG_CURRENT_DESKTOP` may hold a colon-separated list, e.g. `ubuntu:GNOME`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn desktop_is_gnome(value: &str) -> bool {
    value.split(':').any(|part| {
        let part = part.trim().to_lowercase();
        part == "gnome" || part.starts_with("gnome-") || part == "unity" || part == "budgie"
    })
}

/// Applies a catalog entry, downscaling it to the screen width first when enabled.
///
/// Returns the path that was actually applied. The catalog entry itself is
/// never modified.
///
/// # Errors
///
/// Returns an error if the file is missing, the variant cannot be created,
/// or the setter fails.
pub fn apply(
    setter: &dyn WallpaperSetter,
    entry: &Path,
    config: &RedwallConfig,
    screen: ScreenSize,
) -> Result<PathBuf, WallpaperError> {
    if !entry.exists() {
        return Err(WallpaperError::FileNotFound(entry.display().to_string()));
    }

    let target = if config.downscale {
        imaging::downscale(entry, screen.width)
            .map_err(|err| WallpaperError::Variant(err.to_string()))?
    } else {
        entry.to_path_buf()
    };

    let target = target.canonicalize().unwrap_or(target);
    setter.set(&target)?;

    tracing::info!(setter = setter.name(), path = %target.display(), "wallpaper changed");
    Ok(target)
}

/// Setter that remembers what it was asked to apply.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSetter {
    applied: parking_lot::Mutex<Vec<PathBuf>>,
    fail: bool,
}

#[cfg(test)]
impl RecordingSetter {
    pub fn failing() -> Self { Self { applied: parking_lot::Mutex::default(), fail: true } }

    pub fn applied(&self) -> Vec<PathBuf> { self.applied.lock().clone() }
}

#[cfg(test)]
impl WallpaperSetter for RecordingSetter {
    fn name(&self) -> &'static str { "recording" }

    fn set(&self, path: &Path) -> Result<(), WallpaperError> {
        self.applied.lock().push(path.to_path_buf());
        if self.fail {
            return Err(WallpaperError::SetWallpaperFailed("refused".to_string()));
        }
        Ok(())
    }
}
