//! Fingerprint-keyed cache of rendered images
//!
//! Rendered images are cached under the fingerprint of the graph spec that produced
//! them. Two backends exist:
//!
//! - [`MemoryCache`]: a process-lifetime map shared by every clone of the
//!   [`CacheService`]. Nothing is persisted and nothing is evicted.
//! - [`FilesystemCache`]: one file per entry, named
//!   `<prefix>-graph-<fingerprint>.png`, in a configured directory. The
//!   presence of the file is the existence check.
//!
//! # Lifetime
//!
//! A [`CacheService`] is created once per host session and handed to the
//! [`RenderCoordinator`](crate::render::RenderCoordinator). For each request
//! the service yields a [`CacheStore`] bound to the request's root directory,
//! which matters only when the filesystem backend uses a relative directory.
//!
//! # Failure policy
//!
//! Lookups never fail: a cold cache, a missing directory and an unreadable file
//! all read as a miss (the latter two are logged). Stores report
//! [`CacheError`], which callers log and otherwise ignore.
//!
//! ```text
//! <cache dir>/
//! ├── plotmark-graph-3f4c...e9.png
//! └── plotmark-graph-a01b...77.png
//! ```

mod filesystem;
mod memory;

pub use filesystem::FilesystemCache;
pub use memory::MemoryCache;

use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;

use crate::config::{CacheLocation, CacheSettings};

/// Failure to read or write a cache entry.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The configured cache directory does not exist. It is never created.
    #[error("Cache directory does not exist: {}", path.display())]
    DirectoryMissing {
        /// The resolved cache directory
        path: PathBuf,
    },

    /// Writing a cache file failed.
    #[error("Failed to write cache file {}", path.display())]
    IoFailure {
        /// The cache file that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading an existing cache file failed; treated as a miss.
    #[error("Failed to read cache file {}", path.display())]
    ReadFailed {
        /// The cache file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Where an entry for a fingerprint lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheTarget {
    /// Key in the in-memory map
    Memory(String),
    /// File in the cache directory
    File(PathBuf),
}

/// Key/value storage for rendered images.
#[allow(async_fn_in_trait)]
pub trait CacheBackend {
    /// Cached image for a fingerprint, or `None` on a miss.
    async fn lookup(&self, fingerprint: &str) -> Option<Bytes>;

    /// Insert or overwrite the image for a fingerprint.
    async fn store(&self, fingerprint: &str, image: Bytes) -> Result<(), CacheError>;

    /// Where the entry for a fingerprint is or would be kept.
    fn target(&self, fingerprint: &str) -> CacheTarget;
}

/// A cache backend selected by configuration.
#[derive(Debug, Clone)]
pub enum CacheStore {
    Memory(MemoryCache),
    Filesystem(FilesystemCache),
}

impl CacheBackend for CacheStore {
    async fn lookup(&self, fingerprint: &str) -> Option<Bytes> {
        match self {
            Self::Memory(cache) => cache.lookup(fingerprint).await,
            Self::Filesystem(cache) => cache.lookup(fingerprint).await,
        }
    }

    async fn store(&self, fingerprint: &str, image: Bytes) -> Result<(), CacheError> {
        match self {
            Self::Memory(cache) => cache.store(fingerprint, image).await,
            Self::Filesystem(cache) => cache.store(fingerprint, image).await,
        }
    }

    fn target(&self, fingerprint: &str) -> CacheTarget {
        match self {
            Self::Memory(cache) => cache.target(fingerprint),
            Self::Filesystem(cache) => cache.target(fingerprint),
        }
    }
}

/// Session-scoped cache service.
///
/// Cloning is cheap and clones share the same in-memory map.
#[derive(Debug, Clone)]
pub struct CacheService {
    settings: CacheSettings,
    file_prefix: String,
    memory: MemoryCache,
}

impl CacheService {
    pub fn new(settings: CacheSettings, file_prefix: impl Into<String>) -> Self {
        Self {
            settings,
            file_prefix: file_prefix.into(),
            memory: MemoryCache::new(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    #[must_use]
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// The session's in-memory map, regardless of the configured location.
    #[must_use]
    pub fn memory(&self) -> &MemoryCache {
        &self.memory
    }

    /// Backend for a request rooted at `root`.
    #[must_use]
    pub fn store_for(&self, root: &Path) -> CacheStore {
        match self.settings.location {
            CacheLocation::Memory => CacheStore::Memory(self.memory.clone()),
            CacheLocation::Filesystem => CacheStore::Filesystem(FilesystemCache::new(
                resolve_directory(self.settings.directory.as_deref(), root),
                self.file_prefix.clone(),
            )),
        }
    }
}

/// Resolve the filesystem cache directory.
///
/// An absolute configured path is used verbatim, a relative one is joined to
/// `root`, and an unset one falls back to the platform temporary directory.
#[must_use]
pub fn resolve_directory(configured: Option<&Path>, root: &Path) -> PathBuf {
    match configured {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => root.join(path),
        None => std::env::temp_dir(),
    }
}
