use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use pathable_base::{PathableResult, Segment};
use tracing::{debug, trace};

use crate::config::CacheConfig;

/* 📖 # Why does every accessor own its cache?

Memoization state belongs to the accessor instance that produced the values. Two
accessors over the same root never share entries, and dropping an accessor drops its
cache with it. There is no global table keyed by object identity, so there is
nothing that can outlive the data it describes.

Only terminal reads go through the cache. Keys, lengths, stat and membership
checks always re-resolve against the backing store.
*/

/// Hit/miss counters and current size of a [`ResultCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
}

#[derive(Debug)]
struct CacheState<V> {
    enabled: bool,
    /// `None` means unbounded, `Some(0)` means pass-through.
    limit: Option<usize>,
    entries: Option<LruCache<Vec<Segment>, V>>,
    hits: u64,
    misses: u64,
}

impl<V> CacheState<V> {
    fn build(limit: Option<usize>) -> Option<LruCache<Vec<Segment>, V>> {
        match limit {
            None => Some(LruCache::unbounded()),
            Some(limit) => NonZeroUsize::new(limit).map(LruCache::new),
        }
    }
}

/// Least-recently-used memo of read results, keyed by the full segment sequence.
#[derive(Debug)]
pub struct ResultCache<V: Clone> {
    state: Mutex<CacheState<V>>,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(config: &CacheConfig) -> Self {
        let limit = config.limit();
        let entries = if config.enabled {
            CacheState::build(limit)
        } else {
            None
        };
        Self {
            state: Mutex::new(CacheState {
                enabled: config.enabled,
                limit,
                entries,
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Return the cached value for `key`, or compute, store and return it.
    ///
    /// The lock is not held while `compute` runs. Errors are returned as-is and
    /// never cached.
    pub fn get_or_compute<F>(&self, key: &[Segment], compute: F) -> PathableResult<V>
    where
        F: FnOnce() -> PathableResult<V>,
    {
        {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if let Some(entries) = state.entries.as_mut() {
                if let Some(value) = entries.get(key) {
                    let value = value.clone();
                    state.hits += 1;
                    trace!(depth = key.len(), "cache hit");
                    return Ok(value);
                }
                state.misses += 1;
            }
        }

        let value = compute()?;

        let mut state = self.state.lock();
        if let Some(entries) = state.entries.as_mut() {
            if let Some((evicted, _)) = entries.push(key.to_vec(), value.clone()) {
                if evicted.as_slice() != key {
                    trace!(depth = evicted.len(), "evicted least recently used entry");
                }
            }
        }
        Ok(value)
    }

    /// Turn caching on with a new bound, dropping current entries.
    pub fn enable(&self, limit: Option<usize>) {
        let mut state = self.state.lock();
        state.enabled = true;
        state.limit = limit;
        state.entries = CacheState::build(limit);
        debug!(?limit, "cache enabled");
    }

    /// Drop all entries and stop caching until re-enabled.
    pub fn disable(&self) {
        let mut state = self.state.lock();
        state.enabled = false;
        state.entries = None;
        debug!("cache disabled");
    }

    pub fn clear(&self) {
        if let Some(entries) = self.state.lock().entries.as_mut() {
            entries.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// Configured bound; `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        self.state.lock().limit
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            len: state.entries.as_ref().map_or(0, LruCache::len),
        }
    }
}

impl<V: Clone> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
