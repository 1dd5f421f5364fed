use std::path::Path;

use super::{WallpaperError, WallpaperSetter};

/// Sets the background with the platform API via the `wallpaper` crate.
///
/// On Windows this updates the user profile and broadcasts the change, so
/// the wallpaper applies immediately and survives a restart.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSetter;

impl WallpaperSetter for NativeSetter {
    fn name(&self) -> &'static str { "native" }

    fn set(&self, path: &Path) -> Result<(), WallpaperError> {
        let path_str = path.display().to_string();

        wallpaper::set_from_path(&path_str)
            .map_err(|e| WallpaperError::SetWallpaperFailed(e.to_string()))?;

        if let Err(err) = wallpaper::set_mode(wallpaper::Mode::Fit) {
            tracing::debug!(error = %err, "could not set wallpaper fit mode");
        }

        Ok(())
    }
}
