//! Redwall - keeps a local catalog of subreddit wallpapers and rotates the
//! desktop background.
//!
//! Two loops share the catalog: the updater (background thread) fetches
//! feeds and adds accepted images, and the rotator (main thread) applies a
//! random not-yet-shown entry on a timer.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod daemon;
pub mod error;
pub mod feed;
pub mod imaging;
pub mod logging;
pub mod paths;
pub mod rotator;
pub mod screen;
pub mod shutdown;
pub mod updater;
pub mod wallpaper;
