//! Subreddit feed client.
//!
//! Fetches `https://<host>/r/<feed>.json` listings and streams image bodies.
//! The updater talks to feeds through the [`FeedSource`] trait, so it can run
//! against an in-memory source in tests.

use std::io::Write;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::USER_AGENT;
use crate::imaging::SUPPORTED_EXTENSIONS;

/// Errors raised while talking to a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },
    /// The listing body was not the expected JSON shape.
    #[error("unexpected listing format for r/{feed}: {source}")]
    Decode {
        feed: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A single post from a listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    /// Link target of the post; for image posts, the image itself.
    #[serde(default)]
    pub url: String,
    /// Whether the post is flagged as not safe for work.
    #[serde(default)]
    pub over_18: bool,
}

impl Post {
    /// Filename the image is stored under, if the URL points to a supported image.
    #[must_use]
    pub fn image_filename(&self) -> Option<String> { image_filename(&self.url) }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: Post,
}

/// Source of posts and image bodies.
pub trait FeedSource: Send + Sync {
    /// Returns up to `limit` posts from `feed`, in listing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be fetched or decoded.
    fn fetch_posts(&self, feed: &str, limit: usize) -> Result<Vec<Post>, FeedError>;

    /// Streams the body at `url` into `dest`, returning the byte count.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be copied.
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64, FeedError>;
}

/// Blocking HTTP client for Reddit listings.
#[derive(Debug, Clone)]
pub struct RedditClient {
    client: Client,
    host: String,
}

impl RedditClient {
    /// Creates a client for `host` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(host: &str, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FeedError::Client)?;

        Ok(Self { client, host: host.trim().trim_end_matches('/').to_string() })
    }

    /// Listing URL for a feed.
    #[must_use]
    pub fn listing_url(&self, feed: &str, limit: usize) -> String {
        format!("https://{}/r/{}.json?limit={limit}", self.host, feed.trim())
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, FeedError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FeedError::Request { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus { url: url.to_string(), status: status.as_u16() });
        }

        Ok(response)
    }
}

impl FeedSource for RedditClient {
    fn fetch_posts(&self, feed: &str, limit: usize) -> Result<Vec<Post>, FeedError> {
        let url = self.listing_url(feed, limit);
        let listing: Listing = self
            .get(&url)?
            .json()
            .map_err(|source| FeedError::Decode { feed: feed.to_string(), source })?;

        Ok(listing.data.children.into_iter().take(limit).map(|child| child.data).collect())
    }

    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64, FeedError> {
        let mut response = self.get(url)?;
        response
            .copy_to(dest)
            .map_err(|source| FeedError::Request { url: url.to_string(), source })
    }
}

/// Derives the local filename from the last segment of an image URL.
///
/// Returns `None` for URLs that don't parse, have no final segment, or whose
/// extension is not one of [`SUPPORTED_EXTENSIONS`]. Dot-prefixed segments
/// are refused too: the catalog treats hidden files as in-flight downloads.
/// Query strings and fragments are ignored.
#[must_use]
pub fn image_filename(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).next_back()?;

    let (stem, extension) = segment.rsplit_once('.')?;
    let supported = SUPPORTED_EXTENSIONS.contains(&extension.to_lowercase().as_str());
    if stem.is_empty() || segment.starts_with('.') || !supported {
        return None;
    }

    Some(segment.to_string())
}
