//! End-to-end tests for the updater, catalog, and rotator working together.
//!
//! Feeds are served from memory and wallpapers are recorded instead of
//! applied, so these run without network access or a desktop session.
//!
//! ```bash
//! cargo test -p redwall --test catalog_pipeline
//! ```

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use image::{DynamicImage, ImageFormat};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use redwall_lib::catalog::{self, Catalog};
use redwall_lib::config::{CatalogSource, RedwallConfig};
use redwall_lib::feed::{FeedError, FeedSource, Post};
use redwall_lib::imaging;
use redwall_lib::rotator::Rotator;
use redwall_lib::screen::ScreenSize;
use redwall_lib::shutdown::Shutdown;
use redwall_lib::updater::CatalogUpdater;
use redwall_lib::wallpaper::{WallpaperError, WallpaperSetter};
use tempfile::TempDir;

const SCREEN: ScreenSize = ScreenSize { width: 64, height: 36 };

// ============================================================================
// Fakes
// ============================================================================

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[derive(Default)]
struct MemoryFeed {
    feeds: HashMap<String, Vec<Post>>,
    bodies: HashMap<String, Vec<u8>>,
    downloads: Mutex<Vec<String>>,
}

impl MemoryFeed {
    fn post(mut self, feed: &str, url: &str, body: Option<Vec<u8>>) -> Self {
        self.feeds
            .entry(feed.to_string())
            .or_default()
            .push(Post { url: url.to_string(), over_18: false });
        if let Some(body) = body {
            self.bodies.insert(url.to_string(), body);
        }
        self
    }
}

impl FeedSource for MemoryFeed {
    fn fetch_posts(&self, feed: &str, limit: usize) -> Result<Vec<Post>, FeedError> {
        Ok(self.feeds.get(feed).map(|p| p.iter().take(limit).cloned().collect()).unwrap_or_default())
    }

    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64, FeedError> {
        self.downloads.lock().push(url.to_string());
        let body = self
            .bodies
            .get(url)
            .ok_or_else(|| FeedError::UnexpectedStatus { url: url.to_string(), status: 404 })?;
        dest.write_all(body).unwrap();
        Ok(body.len() as u64)
    }
}

#[derive(Default)]
struct Recorder(Mutex<Vec<PathBuf>>);

struct SharedRecorder(Arc<Recorder>);

impl WallpaperSetter for SharedRecorder {
    fn name(&self) -> &'static str { "recorder" }

    fn set(&self, path: &Path) -> Result<(), WallpaperError> {
        self.0.0.lock().push(path.to_path_buf());
        Ok(())
    }
}

struct Workspace {
    _tmp: TempDir,
    dir: PathBuf,
    index: PathBuf,
}

fn workspace() -> Workspace {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().canonicalize().unwrap().join("catalog");
    let index = tmp.path().join("data").join("catalog.json");
    Workspace { _tmp: tmp, dir, index }
}

fn config() -> RedwallConfig {
    RedwallConfig {
        subreddit_list: vec!["wallpapers".to_string(), "earthporn".to_string()],
        shuffle_feeds: false,
        ..RedwallConfig::default()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn test_update_rotate_clear() {
    let ws = workspace();
    let feed = Arc::new(
        MemoryFeed::default()
            .post("wallpapers", "https://i.test/alpha.png", Some(png(96, 54)))
            .post("wallpapers", "https://i.test/tiny.png", Some(png(16, 9)))
            .post("wallpapers", "https://i.test/anim.gif", Some(png(96, 54)))
            .post("earthporn", "https://cdn.test/alpha.png", Some(png(128, 72)))
            .post("earthporn", "https://i.test/beta.png", Some(png(64, 36))),
    );

    let catalog = Arc::new(Catalog::open(ws.dir.clone(), CatalogSource::Index, ws.index.clone()));
    let updater = CatalogUpdater::new(feed.clone(), Arc::clone(&catalog), SCREEN);
    let mut rng = StdRng::seed_from_u64(17);
    let summary = updater.run_pass(&config(), &mut rng, &Shutdown::new());

    assert_eq!(summary.added, 2);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.skipped, 2);

    let downloads = feed.downloads.lock().clone();
    assert!(!downloads.iter().any(|url| url.ends_with(".gif")));
    assert!(!downloads.contains(&"https://cdn.test/alpha.png".to_string()));

    let entries = catalog.snapshot();
    assert_eq!(entries, vec![ws.dir.join("alpha.png"), ws.dir.join("beta.png")]);
    for entry in &entries {
        let (w, h) = image::image_dimensions(entry).unwrap();
        assert!(w >= SCREEN.width && h >= SCREEN.height && w >= h);
    }

    let recorder = Arc::new(Recorder::default());
    let mut rotator =
        Rotator::new(Arc::clone(&catalog), Box::new(SharedRecorder(Arc::clone(&recorder))), SCREEN);
    for _ in 0..4 {
        rotator.run_cycle(&config(), &mut rng).unwrap();
    }

    let applied = recorder.0.lock().clone();
    assert_eq!(applied.len(), 4);
    assert_ne!(applied[0], applied[1]);
    assert_ne!(applied[2], applied[3]);

    assert!(catalog::clear_storage(&ws.dir, &ws.index) > 0);
    assert!(!ws.index.exists());
    let reopened = Catalog::open(ws.dir.clone(), CatalogSource::Index, ws.index.clone());
    assert!(reopened.snapshot().is_empty());
}

#[test]
fn test_downscaled_variant_is_applied_and_reused() {
    let ws = workspace();
    let feed = Arc::new(
        MemoryFeed::default().post("wallpapers", "https://i.test/wide.png", Some(png(128, 72))),
    );
    let catalog = Arc::new(Catalog::open(ws.dir.clone(), CatalogSource::Directory, ws.index.clone()));
    let updater = CatalogUpdater::new(feed, Arc::clone(&catalog), SCREEN);
    let mut rng = StdRng::seed_from_u64(3);
    updater.run_pass(&config(), &mut rng, &Shutdown::new());

    let recorder = Arc::new(Recorder::default());
    let mut rotator =
        Rotator::new(Arc::clone(&catalog), Box::new(SharedRecorder(Arc::clone(&recorder))), SCREEN);
    let config = RedwallConfig { downscale: true, ..config() };

    let first = rotator.run_cycle(&config, &mut rng).unwrap();
    let second = rotator.run_cycle(&config, &mut rng).unwrap();

    let variant = imaging::variant_path(&ws.dir.join("wide.png"), SCREEN.width);
    assert_eq!(first, variant);
    assert_eq!(second, variant);
    assert_eq!(image::image_dimensions(&variant).unwrap(), (64, 36));
    assert_eq!(image::image_dimensions(ws.dir.join("wide.png")).unwrap(), (128, 72));

    // The variant lives in a subdirectory and never becomes a catalog entry.
    assert_eq!(catalog.snapshot(), vec![ws.dir.join("wide.png")]);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_snapshots_during_updates_only_contain_valid_images() {
    let ws = workspace();
    let mut feed = MemoryFeed::default();
    for i in 0..12 {
        let body = if i % 3 == 0 { b"not an image".to_vec() } else { png(80, 45) };
        feed = feed.post("wallpapers", &format!("https://i.test/img{i}.png"), Some(body));
    }
    let config = RedwallConfig { number_of_top_posts: 12, ..config() };

    let catalog = Arc::new(Catalog::open(ws.dir.clone(), CatalogSource::Directory, ws.index.clone()));
    let updater = CatalogUpdater::new(Arc::new(feed), Arc::clone(&catalog), SCREEN);
    let shutdown = Shutdown::new();

    let writer = {
        let shutdown = shutdown.clone();
        thread::spawn(move || {
            let mut rng = StdRng::seed_from_u64(99);
            updater.run_pass(&config, &mut rng, &shutdown)
        })
    };

    let mut seen = HashSet::new();
    while !writer.is_finished() {
        for entry in catalog.snapshot() {
            assert!(imaging::is_valid(&entry), "{} did not decode", entry.display());
            seen.insert(entry);
        }
        thread::sleep(Duration::from_millis(1));
    }

    let summary = writer.join().unwrap();
    assert_eq!(summary.added, 8);
    assert_eq!(summary.rejected, 4);
    assert_eq!(catalog.snapshot().len(), 8);
    assert!(seen.len() <= 8);
}
