//! Long-running mode started by `--start`.
//!
//! The catalog updater runs on a named background thread, the rotator on
//! the calling thread. Ctrl-C or SIGTERM stops both; the updater is joined
//! before returning.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::catalog::Catalog;
use crate::config::ConfigSource;
use crate::constants::APP_NAME;
use crate::error::RedwallError;
use crate::feed::{FeedSource, RedditClient};
use crate::paths;
use crate::rotator::Rotator;
use crate::screen;
use crate::shutdown::Shutdown;
use crate::updater::CatalogUpdater;
use crate::wallpaper;

/// Spawns a thread named `redwall-<name>`.
///
/// # Errors
///
/// Returns an error if the OS refuses to create the thread.
pub fn spawn_named_thread<F>(name: &str, task: F) -> std::io::Result<JoinHandle<()>>
where F: FnOnce() + Send + 'static {
    let thread_name = format!("{APP_NAME}-{name}");

    thread::Builder::new().name(thread_name.clone()).spawn(task).inspect_err(|err| {
        tracing::error!(thread = %thread_name, error = %err, "failed to spawn thread");
    })
}

/// Runs the updater and the rotator until shutdown.
///
/// Catalog location, catalog source, feed host, request timeout, and screen
/// override are read once here; the remaining settings are refreshed every
/// cycle.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the catalog
/// directory cannot be created, the HTTP client cannot be built, or the
/// signal handler cannot be installed.
pub fn start(config_source: &ConfigSource) -> Result<(), RedwallError> {
    let (config, loaded_from) = config_source.load()?;
    match &loaded_from {
        Some(path) => tracing::info!(path = %path.display(), "loaded configuration"),
        None => tracing::info!("using default configuration"),
    }

    let screen = screen::primary_screen_size(config.screen);
    tracing::info!(width = screen.width, height = screen.height, "primary screen");

    let catalog = Arc::new(Catalog::open(
        config.catalog_dir(),
        config.catalog_source,
        paths::default_index_path(),
    ));
    catalog.ensure_dir()?;

    let feed: Arc<dyn FeedSource> =
        Arc::new(RedditClient::new(&config.feed_host, config.request_timeout())?);

    let shutdown = Shutdown::new();
    shutdown.install_signal_handler()?;

    let updater = CatalogUpdater::new(feed, Arc::clone(&catalog), screen);
    let updater_handle = {
        let config_source = config_source.clone();
        let config = config.clone();
        let shutdown = shutdown.clone();
        spawn_named_thread("updater", move || updater.run(&config_source, config, &shutdown))?
    };

    let mut rotator = Rotator::new(catalog, wallpaper::detect_setter(), screen);
    rotator.run(config_source, config, &shutdown);

    // The rotator only returns on shutdown; make sure the updater sees it too.
    shutdown.trigger();
    if updater_handle.join().is_err() {
        tracing::error!("catalog updater thread panicked");
    }

    Ok(())
}
