//! Filesystem cache backend.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;

use super::{CacheBackend, CacheError, CacheTarget};
use crate::constants::{CACHE_FILE_INFIX, IMAGE_EXTENSION};
use crate::core::display_chain;

/// One file per cached image inside a directory.
///
/// The directory must already exist; a store into a missing directory reports
/// [`CacheError::DirectoryMissing`] instead of creating it. Concurrent stores of
/// the same fingerprint overwrite each other and the last write wins.
#[derive(Debug, Clone)]
pub struct FilesystemCache {
    directory: PathBuf,
    prefix: String,
}

impl FilesystemCache {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name for a fingerprint: `<prefix>-graph-<fingerprint>.png`.
    #[must_use]
    pub fn file_name(&self, fingerprint: &str) -> String {
        format!("{}-{CACHE_FILE_INFIX}-{fingerprint}.{IMAGE_EXTENSION}", self.prefix)
    }

    #[must_use]
    pub fn path_for(&self, fingerprint: &str) -> PathBuf {
        self.directory.join(self.file_name(fingerprint))
    }
}

impl CacheBackend for FilesystemCache {
    async fn lookup(&self, fingerprint: &str) -> Option<Bytes> {
        let path = self.path_for(fingerprint);

        match fs::try_exists(&path).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(fingerprint, path = %path.display(), "filesystem cache miss");
                return None;
            }
            Err(source) => {
                let error = CacheError::ReadFailed {
                    path,
                    source,
                };
                tracing::warn!("{}; rendering instead", display_chain(&error));
                return None;
            }
        }

        match fs::read(&path).await {
            Ok(data) => {
                tracing::debug!(fingerprint, path = %path.display(), "filesystem cache hit");
                Some(Bytes::from(data))
            }
            Err(source) => {
                let error = CacheError::ReadFailed {
                    path,
                    source,
                };
                tracing::warn!("{}; rendering instead", display_chain(&error));
                None
            }
        }
    }

    async fn store(&self, fingerprint: &str, image: Bytes) -> Result<(), CacheError> {
        let is_dir = fs::metadata(&self.directory).await.map(|meta| meta.is_dir()).unwrap_or(false);
        if !is_dir {
            return Err(CacheError::DirectoryMissing {
                path: self.directory.clone(),
            });
        }

        let path = self.path_for(fingerprint);
        fs::write(&path, &image).await.map_err(|source| CacheError::IoFailure {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(fingerprint, path = %path.display(), bytes = image.len(), "stored render");
        Ok(())
    }

    fn target(&self, fingerprint: &str) -> CacheTarget {
        CacheTarget::File(self.path_for(fingerprint))
    }
}
