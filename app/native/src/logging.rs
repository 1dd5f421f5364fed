//! Logging initialization using the `tracing` crate.
//!
//! - Uses `RUST_LOG` for filtering (default: `info` for redwall, `warn` for dependencies)
//! - Writes to stderr so `catalog list` and `schema` output stays clean on stdout

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the global tracing subscriber.
///
/// Call once at startup, before any logging occurs. Examples:
/// - `RUST_LOG=debug` - Show debug and above
/// - `RUST_LOG=redwall=trace,warn` - Trace for redwall, warn for others
pub fn init() {
    let default_level = if cfg!(debug_assertions) { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,redwall={default_level},redwall_lib={default_level}")));

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(true)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(true)
        .compact();

    // A second init (e.g. from tests) is not an error worth surfacing.
    let _ = tracing_subscriber::registry().with(filter).with(subscriber).try_init();
}
