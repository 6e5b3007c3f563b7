//! Decoded-image cache over a [`PatchDataset`].
//!
//! Training loops that revisit the same patches every epoch spend most of
//! their time in the JPEG decoder. [`CachedPatchDataset`] keeps the most
//! recently decoded images in an LRU so repeated retrievals skip the file
//! read and decode. Transforms still run on every retrieval.
//!
//! The cache is keyed by index, which is stable for the lifetime of the
//! dataset because the listing never changes after construction.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use image::DynamicImage;
use lru::LruCache;
use serde::Serialize;

use crate::error::DatasetError;

use super::dataset::{decode_patch, PatchDataset, PatchSample};
use super::indexed::{DatasetIter, IndexedDataset};

/// Default number of decoded patches to keep.
pub const DEFAULT_PATCH_CACHE_CAPACITY: usize = 256;

// =============================================================================
// Cache Statistics
// =============================================================================

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Retrievals served from the cache
    pub hits: u64,

    /// Retrievals that decoded from disk
    pub misses: u64,

    /// Decoded patches currently held
    pub entries: usize,

    /// Maximum number of decoded patches held
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of retrievals served from the cache, 0.0 when idle.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// =============================================================================
// Cached Patch Dataset
// =============================================================================

/// A [`PatchDataset`] that keeps recently decoded images in memory.
///
/// Retrieval follows the same steps and error order as
/// [`PatchDataset::get`]; only the decode step consults the cache. Failed
/// decodes are not cached.
///
/// # Thread Safety
///
/// The LRU sits behind a mutex that is never held while decoding or
/// transforming, so concurrent retrievals only serialize on bookkeeping.
/// Two threads missing on the same index may both decode it.
pub struct CachedPatchDataset<T> {
    /// The uncached dataset providing listing, parsing and transforms
    inner: PatchDataset<T>,

    /// Decoded images keyed by index
    cache: Mutex<LruCache<usize, Arc<DynamicImage>>>,

    hits: AtomicU64,
    misses: AtomicU64,
}

impl<T> CachedPatchDataset<T> {
    /// Wrap `dataset` with a cache of the default capacity.
    pub fn new(dataset: PatchDataset<T>) -> Self {
        Self::from_parts(dataset, default_capacity())
    }

    /// Wrap `dataset` with a cache holding at most `capacity` images.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidCacheCapacity`] if `capacity` is 0.
    pub fn with_capacity(dataset: PatchDataset<T>, capacity: usize) -> Result<Self, DatasetError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(DatasetError::InvalidCacheCapacity)?;
        Ok(Self::from_parts(dataset, capacity))
    }

    fn from_parts(inner: PatchDataset<T>, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The wrapped dataset.
    pub fn inner(&self) -> &PatchDataset<T> {
        &self.inner
    }

    pub fn into_inner(self) -> PatchDataset<T> {
        self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Retrieve the patch at `index`, decoding only on a cache miss.
    pub fn get(&self, index: usize) -> Result<PatchSample<T>, DatasetError> {
        let coord = self.inner.coord(index)?;

        let cached = self.lock().get(&index).cloned();
        let image = match cached {
            Some(image) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                image
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                let image = Arc::new(decode_patch(&self.inner.paths()[index])?);
                self.lock().put(index, Arc::clone(&image));
                image
            }
        };

        self.inner.finish(index, &image, coord)
    }

    pub fn iter(&self) -> DatasetIter<'_, Self> {
        DatasetIter::new(self)
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        let cache = self.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: cache.len(),
            capacity: cache.cap().get(),
        }
    }

    /// Drop every cached image and reset the counters.
    pub fn clear(&self) {
        self.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<usize, Arc<DynamicImage>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn default_capacity() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_PATCH_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN)
}

impl<T> IndexedDataset for CachedPatchDataset<T> {
    type Item = PatchSample<T>;

    fn len(&self) -> usize {
        CachedPatchDataset::len(self)
    }

    fn get(&self, index: usize) -> Result<Self::Item, DatasetError> {
        CachedPatchDataset::get(self, index)
    }
}

impl<T> fmt::Debug for CachedPatchDataset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedPatchDataset")
            .field("inner", &self.inner)
            .field("stats", &self.stats())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
