//! Data directory utilities.
//!
//! The catalog index lives in the platform's local data directory
//! (`~/.local/share/redwall` on Linux, `~/Library/Application Support/redwall`
//! on macOS), with a fallback to `/tmp/redwall` if it is unavailable.

use std::path::{Path, PathBuf};

use crate::constants::{APP_NAME, CATALOG_INDEX_FILE};

/// Returns the root data directory for the application.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(
        || PathBuf::from(format!("/tmp/{APP_NAME}")),
        |data| data.join(APP_NAME),
    )
}

/// Returns the default location of the persisted catalog index.
#[must_use]
pub fn default_index_path() -> PathBuf { data_dir().join(CATALOG_INDEX_FILE) }

/// Removes a directory and everything below it.
///
/// # Returns
///
/// * `Ok(bytes_freed)` - The approximate number of bytes freed (0 if absent)
///
/// # Errors
///
/// Returns an error on permission or I/O failures during removal.
pub fn remove_dir(dir: &Path) -> std::io::Result<u64> {
    if !dir.exists() {
        return Ok(0);
    }

    let bytes_freed = calculate_dir_size(dir)?;
    std::fs::remove_dir_all(dir)?;

    Ok(bytes_freed)
}

/// Removes a single file, returning its size (0 if absent).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn remove_file(path: &Path) -> std::io::Result<u64> {
    let Ok(metadata) = std::fs::metadata(path) else {
        return Ok(0);
    };

    std::fs::remove_file(path)?;
    Ok(metadata.len())
}

/// Calculates the total size of a directory in bytes.
fn calculate_dir_size(path: &Path) -> std::io::Result<u64> {
    let mut total = 0u64;

    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                total += calculate_dir_size(&path)?;
            } else {
                total += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }
    }

    Ok(total)
}

/// Formats a byte count as a human-readable string ("1.50 MB", "256 bytes").
#[must_use]
#[allow(clippy::cast_precision_loss)] // Precision loss is acceptable for human-readable output
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
