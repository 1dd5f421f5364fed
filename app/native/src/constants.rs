//! Application-wide constants.

/// Application name, used for config/data directory names.
pub const APP_NAME: &str = "redwall";

/// Identifying `User-Agent` sent with every feed request.
///
/// Reddit throttles requests that use a generic client string.
pub const USER_AGENT: &str = concat!("redwall/", env!("CARGO_PKG_VERSION"));

/// Host used for feed requests unless the configuration overrides it.
pub const DEFAULT_FEED_HOST: &str = "www.reddit.com";

/// File name of the persisted catalog index.
pub const CATALOG_INDEX_FILE: &str = "catalog.json";

/// Prefix for in-flight downloads inside the catalog directory.
///
/// The leading dot keeps partial files out of directory listings.
pub const DOWNLOAD_PREFIX: &str = ".download-";
