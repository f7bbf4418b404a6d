//! LRU cache for area masks.
//!
//! Files from one data source normally share a coordinate grid, so an
//! area's mask can be built once and reused by every later file. Entries
//! are keyed by the grid's spatial fingerprint and the area's name and
//! boundary fingerprint.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use climate_common::CoordinateGrid;
use lru::LruCache;
use tracing::debug;

use crate::area::ResolvedArea;
use crate::mask::{area_mask, Mask, MaskProvider};

/// Cache key for masks: (grid spatial fingerprint, area name, area
/// geometry fingerprint).
pub type MaskKey = (u64, String, u64);

/// Mask cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaskCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl MaskCacheStats {
    /// Fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Shared LRU mask cache, safe to use from every worker.
pub struct CachedMasks {
    cache: Mutex<LruCache<MaskKey, Arc<Mask>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedMasks {
    /// Create a cache holding at most `capacity` masks (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get cache statistics.
    pub fn stats(&self) -> MaskCacheStats {
        MaskCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock().len(),
        }
    }

    /// Clear all entries from the cache.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a half-written entry, so
    // a poisoned cache is still usable.
    fn lock(&self) -> MutexGuard<'_, LruCache<MaskKey, Arc<Mask>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MaskProvider for CachedMasks {
    fn mask_for(&self, grid: &CoordinateGrid, area: &ResolvedArea) -> Arc<Mask> {
        let key = (
            grid.spatial_fingerprint(),
            area.name.clone(),
            area.geometry_fingerprint(),
        );

        if let Some(mask) = self.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(mask);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(area = %area.name, fingerprint = key.0, "Building area mask");

        // Built outside the lock; concurrent misses on one key compute the
        // same mask and the last insert wins.
        let mask = Arc::new(area_mask(grid, area));
        self.lock().put(key, Arc::clone(&mask));
        mask
    }
}

impl std::fmt::Debug for CachedMasks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedMasks")
            .field("stats", &self.stats())
            .finish()
    }
}
