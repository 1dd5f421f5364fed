//! Error types for Redwall.
//!
//! `RedwallError` is what the CLI surfaces to the user. Module-level errors
//! convert into it so command handlers can use `?` throughout.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::feed::FeedError;
use crate::imaging::ImagingError;
use crate::wallpaper::WallpaperError;

/// Errors that can occur during application execution.
#[derive(Debug, Error)]
pub enum RedwallError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    CatalogError(String),
    /// Feed request failed.
    #[error("Feed error: {0}")]
    FeedError(String),
    /// Image processing failed.
    #[error("Image error: {0}")]
    ImageError(String),
    /// Wallpaper operation failed.
    #[error("Wallpaper error: {0}")]
    WallpaperError(String),
    /// Signal handler could not be installed.
    #[error("Signal error: {0}")]
    SignalError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for RedwallError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for RedwallError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for RedwallError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<CatalogError> for RedwallError {
    fn from(err: CatalogError) -> Self { Self::CatalogError(err.to_string()) }
}

impl From<FeedError> for RedwallError {
    fn from(err: FeedError) -> Self { Self::FeedError(err.to_string()) }
}

impl From<ImagingError> for RedwallError {
    fn from(err: ImagingError) -> Self { Self::ImageError(err.to_string()) }
}

impl From<WallpaperError> for RedwallError {
    fn from(err: WallpaperError) -> Self { Self::WallpaperError(err.to_string()) }
}

impl From<ctrlc::Error> for RedwallError {
    fn from(err: ctrlc::Error) -> Self { Self::SignalError(err.to_string()) }
}

impl From<String> for RedwallError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for RedwallError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = RedwallError::ConfigError("Invalid JSON".to_string());
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_catalog_error_display() {
        let err = RedwallError::CatalogError("index unreadable".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Catalog error"));
        assert!(msg.contains("index unreadable"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: RedwallError = io_err.into();
        assert!(matches!(err, RedwallError::IoError(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_from_config_error() {
        let err: RedwallError = ConfigError::NotFound.into();
        assert!(matches!(err, RedwallError::ConfigError(_)));
    }

    #[test]
    fn test_from_feed_error() {
        let err: RedwallError = FeedError::UnexpectedStatus {
            url: "https://www.reddit.com/r/wallpapers.json".to_string(),
            status: 429,
        }
        .into();
        assert!(matches!(err, RedwallError::FeedError(_)));
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_from_str() {
        let err: RedwallError = "boom".into();
        assert!(matches!(err, RedwallError::CommandError(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
