use std::path::Path;
use std::process::Command;

use super::{WallpaperError, WallpaperSetter};

const SCHEMA: &str = "org.gnome.desktop.background";

/// Sets the background through `gsettings`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GnomeSetter;

impl GnomeSetter {
    fn gsettings(key: &str, value: &str) -> Result<(), WallpaperError> {
        let status = Command::new("gsettings")
            .args(["set", SCHEMA, key, value])
            .status()
            .map_err(|err| WallpaperError::SetWallpaperFailed(format!("gsettings: {err}")))?;

        if !status.success() {
            return Err(WallpaperError::SetWallpaperFailed(format!("gsettings {key} exited with {status}")));
        }

        Ok(())
    }
}

impl WallpaperSetter for GnomeSetter {
    fn name(&self) -> &'static str { "gsettings" }

    fn set(&self, path: &Path) -> Result<(), WallpaperError> {
        let uri = file_uri(path)?;
        Self::gsettings("picture-uri", &uri)?;

        // picture-uri-dark only exists on GNOME 42+.
        if let Err(err) = Self::gsettings("picture-uri-dark", &uri) {
            tracing::debug!(error = %err, "could not set dark wallpaper");
        }

        if let Err(err) = Self::gsettings("picture-options", "scaled") {
            tracing::debug!(error = %err, "could not set wallpaper scaling");
        }

        Ok(())
    }
}

fn file_uri(path: &Path) -> Result<String, WallpaperError> {
    let path = path.to_str().ok_or_else(|| {
        WallpaperError::SetWallpaperFailed(format!("path is not valid UTF-8: {}", path.display()))
    })?;
    Ok(format!("file://{path}"))
}
