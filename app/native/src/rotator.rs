//! Wallpaper rotation.
//!
//! Every cycle reads a fresh catalog snapshot, picks a random entry that has
//! not been shown in the current round, and applies it. Once every live
//! entry has been shown the round starts over.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::catalog::Catalog;
use crate::config::{ConfigSource, RedwallConfig};
use crate::screen::ScreenSize;
use crate::shutdown::Shutdown;
use crate::wallpaper::{self, WallpaperSetter};

/// Entries already shown in the current round.
///
/// Membership is checked against the live catalog on every pick, so entries
/// that disappear from the catalog simply stop mattering.
#[derive(Debug, Default)]
pub struct UsedSet {
    used: HashSet<PathBuf>,
}

impl UsedSet {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn len(&self) -> usize { self.used.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.used.is_empty() }

    /// Picks an unshown entry uniformly at random and marks it as shown.
    ///
    /// When every entry has been shown the set is reset first. Returns
    /// `None` only for an empty catalog.
    pub fn choose<R: Rng + ?Sized>(&mut self, catalog: &[PathBuf], rng: &mut R) -> Option<PathBuf> {
        let mut options: Vec<&PathBuf> = catalog.iter().filter(|p| !self.used.contains(*p)).collect();

        if options.is_empty() {
            if !self.used.is_empty() {
                tracing::debug!(shown = self.used.len(), "rotation round complete");
            }
            self.used.clear();
            options = catalog.iter().collect();
        }

        let choice = (*options.choose(rng)?).clone();
        self.used.insert(choice.clone());
        Some(choice)
    }
}

/// Drives the wallpaper from the catalog on a timer.
pub struct Rotator {
    catalog: Arc<Catalog>,
    setter: Box<dyn WallpaperSetter>,
    screen: ScreenSize,
    used: UsedSet,
}

impl Rotator {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, setter: Box<dyn WallpaperSetter>, screen: ScreenSize) -> Self {
        Self { catalog, setter, screen, used: UsedSet::new() }
    }

    /// Runs one rotation step.
    ///
    /// Returns the applied path, or `None` if the catalog is empty or the
    /// setter failed. Failures are logged and never propagate.
    pub fn run_cycle<R: Rng + ?Sized>(&mut self, config: &RedwallConfig, rng: &mut R) -> Option<PathBuf> {
        let entries = self.catalog.snapshot();

        let Some(choice) = self.used.choose(&entries, rng) else {
            tracing::info!("catalog is empty, waiting for the updater");
            return None;
        };

        match wallpaper::apply(self.setter.as_ref(), &choice, config, self.screen) {
            Ok(applied) => Some(applied),
            Err(err) => {
                tracing::warn!(path = %choice.display(), error = %err, "failed to apply wallpaper");
                None
            }
        }
    }

    /// Rotates until shutdown, refreshing the configuration between cycles.
    pub fn run(&mut self, config_source: &ConfigSource, initial: RedwallConfig, shutdown: &Shutdown) {
        let mut config = initial;
        let mut rng = rand::rng();

        tracing::info!(
            interval_secs = config.wallpaper_change_interval,
            setter = self.setter.name(),
            "wallpaper rotator started"
        );

        while !shutdown.is_triggered() {
            self.run_cycle(&config, &mut rng);

            if shutdown.wait_timeout(config.rotation_interval()) {
                break;
            }
            config = config_source.refresh(&config);
        }

        tracing::info!("wallpaper rotator stopped");
    }
}
