use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use crate::models::Neighborhood;

/// In-process cache for neighborhood reference data
///
/// Every matching request scores the full neighborhood set, so the list is
/// kept in memory for `ttl_secs` and dropped whenever a neighborhood is
/// written. Shared by all HTTP workers.
///
/// Every invalidation bumps a generation counter. A list read from the
/// database is only kept if no invalidation happened since the read began,
/// so a slow reader can't put back a list that predates a write.
pub struct CacheManager {
    neighborhoods: moka::future::Cache<String, Arc<Vec<Neighborhood>>>,
    generation: AtomicU64,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let neighborhoods = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            neighborhoods,
            generation: AtomicU64::new(0),
            ttl_secs,
        }
    }

    /// Cached neighborhood list, if present
    pub async fn get_neighborhoods(&self) -> Option<Arc<Vec<Neighborhood>>> {
        let key = CacheKey::neighborhoods();
        let cached = self.neighborhoods.get(&key).await;

        if cached.is_some() {
            tracing::trace!("Cache hit: {}", key);
        } else {
            tracing::trace!("Cache miss: {}", key);
        }

        cached
    }

    /// Store the neighborhood list, returning the shared handle
    pub async fn set_neighborhoods(&self, neighborhoods: Vec<Neighborhood>) -> Arc<Vec<Neighborhood>> {
        let shared = Arc::new(neighborhoods);
        self.neighborhoods
            .insert(CacheKey::neighborhoods(), Arc::clone(&shared))
            .await;

        tracing::trace!("Cache set: {} ({} entries)", CacheKey::neighborhoods(), shared.len());
        shared
    }

    /// Current invalidation generation. Capture it before reading the list
    /// from the database and hand it to `set_neighborhoods_at`.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Store a list read at `generation`, unless it was invalidated meanwhile
    ///
    /// Always returns the shared handle so the caller can still serve it.
    pub async fn set_neighborhoods_at(
        &self,
        neighborhoods: Vec<Neighborhood>,
        generation: u64,
    ) -> Arc<Vec<Neighborhood>> {
        let shared = Arc::new(neighborhoods);

        if self.generation() != generation {
            tracing::debug!("Skipping stale cache set: {}", CacheKey::neighborhoods());
            return shared;
        }

        self.neighborhoods
            .insert(CacheKey::neighborhoods(), Arc::clone(&shared))
            .await;

        // An invalidation may have landed between the check and the insert
        if self.generation() != generation {
            self.neighborhoods.invalidate(&CacheKey::neighborhoods()).await;
            tracing::debug!("Dropped stale cache set: {}", CacheKey::neighborhoods());
        }

        shared
    }

    /// Drop the cached list after a neighborhood write
    pub async fn invalidate_neighborhoods(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.neighborhoods.invalidate(&CacheKey::neighborhoods()).await;
        tracing::debug!("Invalidated cache key: {}", CacheKey::neighborhoods());
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.neighborhoods.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build the cache key for the full neighborhood list
    pub fn neighborhoods() -> String {
        "neighborhoods:all".to_string()
    }
}
