//! In-memory cache backend.

use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;

use super::{CacheBackend, CacheError, CacheTarget};

/// Unbounded, process-lifetime map from fingerprint to image.
///
/// Clones share the same map. The last insert for a fingerprint wins.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, Bytes>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, fingerprint: &str) -> bool {
        self.entries.contains_key(fingerprint)
    }
}

impl CacheBackend for MemoryCache {
    async fn lookup(&self, fingerprint: &str) -> Option<Bytes> {
        let hit = self.entries.get(fingerprint).map(|entry| entry.value().clone());
        tracing::debug!(
            fingerprint,
            hit = hit.is_some(),
            "memory cache lookup"
        );
        hit
    }

    async fn store(&self, fingerprint: &str, image: Bytes) -> Result<(), CacheError> {
        self.entries.insert(fingerprint.to_string(), image);
        Ok(())
    }

    fn target(&self, fingerprint: &str) -> CacheTarget {
        CacheTarget::Memory(fingerprint.to_string())
    }
}
