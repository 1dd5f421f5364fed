//! The wallpaper catalog.
//!
//! The catalog is the set of accepted images. Depending on
//! [`CatalogSource`], its entries come from a persisted index (a flat JSON
//! list of absolute paths, rewritten after every addition) or from the live
//! listing of the catalog directory.
//!
//! The updater and the rotator share one `Catalog` behind an `Arc`. The
//! in-memory list sits behind a read-write lock, and every read returns an
//! owned snapshot filtered to files that still exist and decode. Stale
//! entries are skipped on read, never removed.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::config::CatalogSource;
use crate::imaging;
use crate::paths;

/// Errors raised by catalog storage.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A filesystem operation failed.
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The index could not be encoded or decoded.
    #[error("catalog index {path} is not valid: {source}")]
    Index {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io { action, path: path.display().to_string(), source }
    }
}

/// Shared catalog of accepted wallpapers.
#[derive(Debug)]
pub struct Catalog {
    dir: PathBuf,
    source: CatalogSource,
    index_path: PathBuf,
    /// Index-mode entries; unused in directory mode.
    entries: RwLock<Vec<PathBuf>>,
}

impl Catalog {
    /// Opens the catalog, loading the index when `source` is `Index`.
    ///
    /// An unreadable or corrupt index is logged and treated as empty; the next
    /// addition overwrites it.
    #[must_use]
    pub fn open(dir: PathBuf, source: CatalogSource, index_path: PathBuf) -> Self {
        let entries = match source {
            CatalogSource::Index => load_index(&index_path).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "ignoring unreadable catalog index");
                Vec::new()
            }),
            CatalogSource::Directory => Vec::new(),
        };

        tracing::debug!(
            dir = %dir.display(),
            source = ?source,
            entries = entries.len(),
            "catalog opened"
        );

        Self { dir, source, index_path, entries: RwLock::new(entries) }
    }

    /// Directory holding the catalog images.
    #[must_use]
    pub fn dir(&self) -> &Path { &self.dir }

    /// Location of the persisted index.
    #[must_use]
    pub fn index_path(&self) -> &Path { &self.index_path }

    /// Where the entries come from.
    #[must_use]
    pub const fn source(&self) -> CatalogSource { self.source }

    /// Creates the catalog directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_dir(&self) -> Result<(), CatalogError> {
        fs::create_dir_all(&self.dir).map_err(|err| CatalogError::io("create", &self.dir, err))
    }

    /// Path an image named `filename` is stored under.
    #[must_use]
    pub fn entry_path(&self, filename: &str) -> PathBuf { self.dir.join(filename) }

    /// Whether an entry with this filename is already catalogued.
    ///
    /// Deduplication is by filename only: two different images whose URLs end
    /// in the same segment collide, and the later one is skipped.
    #[must_use]
    pub fn contains_filename(&self, filename: &str) -> bool {
        match self.source {
            CatalogSource::Index => {
                self.entries.read().iter().any(|entry| entry.file_name().is_some_and(|n| n == filename))
            }
            CatalogSource::Directory => self.entry_path(filename).is_file(),
        }
    }

    /// Registers an accepted image.
    ///
    /// In index mode the entry is appended and the whole index rewritten
    /// atomically. In directory mode the file is already visible and nothing
    /// else happens. Returns `false` if the path was already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be written.
    pub fn insert(&self, path: PathBuf) -> Result<bool, CatalogError> {
        if self.source == CatalogSource::Directory {
            return Ok(true);
        }

        let mut entries = self.entries.write();
        if entries.contains(&path) {
            return Ok(false);
        }

        entries.push(path);
        save_index(&self.index_path, &entries)?;
        Ok(true)
    }

    /// Returns the current entries that exist and carry a readable image header.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PathBuf> {
        let candidates = match self.source {
            CatalogSource::Index => self.entries.read().clone(),
            CatalogSource::Directory => imaging::list_images_in_directory(&self.dir),
        };

        let total = candidates.len();
        let live: Vec<PathBuf> =
            candidates.into_iter().filter(|p| p.is_file() && imaging::is_valid(p)).collect();

        if live.len() < total {
            tracing::debug!(stale = total - live.len(), "skipped stale catalog entries");
        }

        live
    }

    /// Number of registered entries, without checking the files.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.source {
            CatalogSource::Index => self.entries.read().len(),
            CatalogSource::Directory => imaging::list_images_in_directory(&self.dir).len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Deletes the catalog directory and the index file.
    ///
    /// Best-effort: failures are logged and otherwise ignored. Returns the
    /// approximate number of bytes freed.
    pub fn clear(&self) -> u64 {
        self.entries.write().clear();
        clear_storage(&self.dir, &self.index_path)
    }
}

/// Deletes a catalog directory and index file without opening the catalog.
///
/// Best-effort, like [`Catalog::clear`].
pub fn clear_storage(dir: &Path, index_path: &Path) -> u64 {
    let mut freed = 0;

    match paths::remove_dir(dir) {
        Ok(bytes) => freed += bytes,
        Err(err) => {
            tracing::warn!(error = %err, path = %dir.display(), "failed to remove catalog directory");
        }
    }

    match paths::remove_file(index_path) {
        Ok(bytes) => freed += bytes,
        Err(err) => {
            tracing::warn!(error = %err, path = %index_path.display(), "failed to remove catalog index");
        }
    }

    freed
}

/// Reads the index file. A missing file is an empty catalog.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_index(path: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(CatalogError::io("read", path, err)),
    };

    serde_json::from_reader(BufReader::new(file))
        .map_err(|source| CatalogError::Index { path: path.display().to_string(), source })
}

/// Writes the index through a temporary file, so readers never see a torn list.
fn save_index(path: &Path, entries: &[PathBuf]) -> Result<(), CatalogError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|err| CatalogError::io("create", parent, err))?;

    let tmp = NamedTempFile::new_in(parent).map_err(|err| CatalogError::io("create", parent, err))?;
    write_index(tmp.as_file(), entries).map_err(|err| CatalogError::io("write", path, err))?;
    tmp.as_file().sync_all().map_err(|err| CatalogError::io("sync", path, err))?;

    tmp.persist(path).map_err(|err| CatalogError::io("write", path, err.error))?;
    Ok(())
}

/// Serializes the entries and flushes, so a short write is an error.
fn write_index<W: Write>(dest: W, entries: &[PathBuf]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(dest);
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writer.flush()
}
