//! Catalog updater.
//!
//! Runs on a background thread. Each pass fetches the configured feeds,
//! downloads new candidate images into hidden temporary files inside the
//! catalog directory, and promotes accepted ones to their final name with
//! a rename. Network and decode failures are logged per feed and per post;
//! they never end the loop.

use std::path::PathBuf;
use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::Catalog;
use crate::config::{ConfigSource, RedwallConfig};
use crate::constants::DOWNLOAD_PREFIX;
use crate::feed::{FeedSource, Post};
use crate::imaging;
use crate::screen::ScreenSize;
use crate::shutdown::Shutdown;

/// Counters for one update pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Posts returned by the feeds.
    pub candidates: usize,
    /// Images downloaded, accepted, and catalogued.
    pub added: usize,
    /// Images downloaded and then rejected by verification.
    pub rejected: usize,
    /// Posts skipped without downloading (duplicate, NSFW, unsupported).
    pub skipped: usize,
    /// Feeds or downloads that failed.
    pub failed: usize,
}

impl PassSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Added => self.added += 1,
            Outcome::Rejected => self.rejected += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// What happened to a single post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Added,
    Rejected,
    Skipped,
    Failed,
}

/// Keeps the catalog filled from the configured feeds.
pub struct CatalogUpdater {
    feed: Arc<dyn FeedSource>,
    catalog: Arc<Catalog>,
    screen: ScreenSize,
}

impl CatalogUpdater {
    #[must_use]
    pub fn new(feed: Arc<dyn FeedSource>, catalog: Arc<Catalog>, screen: ScreenSize) -> Self {
        Self { feed, catalog, screen }
    }

    /// Runs passes until shutdown, refreshing the configuration between them.
    pub fn run(&self, config_source: &ConfigSource, initial: RedwallConfig, shutdown: &Shutdown) {
        let mut config = initial;
        let mut rng = rand::rng();

        tracing::info!(feeds = config.subreddit_list.len(), "catalog updater started");

        while !shutdown.is_triggered() {
            let summary = self.run_pass(&config, &mut rng, shutdown);
            tracing::info!(
                candidates = summary.candidates,
                added = summary.added,
                rejected = summary.rejected,
                skipped = summary.skipped,
                failed = summary.failed,
                "catalog update pass finished"
            );

            if shutdown.wait_timeout(config.update_interval()) {
                break;
            }
            config = config_source.refresh(&config);
        }

        tracing::info!("catalog updater stopped");
    }

    /// Runs a single update pass.
    ///
    /// With `shuffle_feeds` every feed is fetched first and the combined
    /// posts are shuffled; otherwise feeds are processed one after another.
    /// Stops early if shutdown is triggered.
    pub fn run_pass<R: Rng + ?Sized>(
        &self,
        config: &RedwallConfig,
        rng: &mut R,
        shutdown: &Shutdown,
    ) -> PassSummary {
        let mut summary = PassSummary::default();

        if let Err(err) = self.catalog.ensure_dir() {
            tracing::error!(error = %err, "cannot prepare catalog directory, skipping pass");
            summary.failed += 1;
            return summary;
        }

        tracing::debug!(entries = self.catalog.len(), "starting catalog update pass");

        if config.shuffle_feeds {
            let mut posts: Vec<Post> = config
                .subreddit_list
                .iter()
                .flat_map(|feed| self.fetch(feed, config.number_of_top_posts, &mut summary))
                .collect();
            posts.shuffle(rng);

            for post in &posts {
                if shutdown.is_triggered() {
                    break;
                }
                summary.record(self.process(post, config));
            }
        } else {
            for feed in &config.subreddit_list {
                for post in &self.fetch(feed, config.number_of_top_posts, &mut summary) {
                    if shutdown.is_triggered() {
                        return summary;
                    }
                    summary.record(self.process(post, config));
                }
            }
        }

        summary
    }

    fn fetch(&self, feed: &str, limit: usize, summary: &mut PassSummary) -> Vec<Post> {
        match self.feed.fetch_posts(feed, limit) {
            Ok(posts) => {
                tracing::debug!(feed, posts = posts.len(), "fetched feed");
                summary.candidates += posts.len();
                posts
            }
            Err(err) => {
                tracing::warn!(feed, error = %err, "failed to fetch feed, skipping");
                summary.failed += 1;
                Vec::new()
            }
        }
    }

    fn process(&self, post: &Post, config: &RedwallConfig) -> Outcome {
        let Some(filename) = post.image_filename() else {
            tracing::trace!(url = %post.url, "unsupported post");
            return Outcome::Skipped;
        };

        if post.over_18 && !config.allow_nsfw {
            tracing::trace!(url = %post.url, "nsfw post");
            return Outcome::Skipped;
        }

        if self.catalog.contains_filename(&filename) {
            tracing::trace!(filename = %filename, "already catalogued");
            return Outcome::Skipped;
        }

        self.download(post, &filename, config.reject_portrait)
    }

    /// Downloads into a hidden temporary file, verifies it, and renames it into place.
    fn download(&self, post: &Post, filename: &str, reject_portrait: bool) -> Outcome {
        let suffix = PathBuf::from(filename)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut tmp = match tempfile::Builder::new()
            .prefix(DOWNLOAD_PREFIX)
            .suffix(&suffix)
            .tempfile_in(self.catalog.dir())
        {
            Ok(tmp) => tmp,
            Err(err) => {
                tracing::warn!(error = %err, "failed to create download file");
                return Outcome::Failed;
            }
        };

        match self.feed.download(&post.url, tmp.as_file_mut()) {
            Ok(bytes) => tracing::debug!(url = %post.url, bytes, "downloaded image"),
            Err(err) => {
                tracing::warn!(url = %post.url, error = %err, "failed to download image");
                return Outcome::Failed;
            }
        }

        let verdict = match imaging::verify(tmp.path(), self.screen, reject_portrait) {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::warn!(url = %post.url, error = %err, "failed to verify image");
                return Outcome::Failed;
            }
        };

        if !verdict.is_accepted() {
            tracing::debug!(url = %post.url, ?verdict, "rejected image");
            return Outcome::Rejected;
        }

        let dest = self.catalog.entry_path(filename);
        if let Err(err) = tmp.persist(&dest) {
            tracing::warn!(path = %dest.display(), error = %err.error, "failed to move image into catalog");
            return Outcome::Failed;
        }

        if let Err(err) = self.catalog.insert(dest.clone()) {
            tracing::warn!(path = %dest.display(), error = %err, "failed to register image");
            return Outcome::Failed;
        }

        tracing::info!(path = %dest.display(), "added wallpaper to catalog");
        Outcome::Added
    }
}
