//! Compilation cache keyed by trimmed source text.
//!
//! Lookups and inserts go through a sharded [`DashMap`]. Racing misses on the
//! same key may each compile, but the first insert wins and every racer gets
//! that entry back. A failed compile writes nothing. With a capacity set, the
//! least recently used entries are evicted after an insert pushes the cache
//! over it; eviction itself is serialized.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::engine::compile;
use crate::{CompileError, CompiledExpression};

struct CacheEntry {
    compiled: CompiledExpression,
    last_used: AtomicU64,
}

/// Counters describing cache behaviour since construction or the last
/// [`CompilationCache::clear`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

pub struct CompilationCache {
    entries: DashMap<Box<str>, CacheEntry, FxBuildHasher>,
    capacity: Option<NonZeroUsize>,
    clock: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    evict_lock: Mutex<()>,
}

impl CompilationCache {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    pub fn with_capacity(capacity: Option<NonZeroUsize>) -> Self {
        CompilationCache {
            entries: DashMap::with_hasher(FxBuildHasher),
            capacity,
            clock: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            evict_lock: Mutex::new(()),
        }
    }

    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Return the cached artifact for `source`, compiling it on a miss.
    pub fn get_or_compile(&self, source: &str) -> Result<CompiledExpression, CompileError> {
        let key = source.trim();

        if let Some(entry) = self.entries.get(key) {
            entry.last_used.store(self.tick(), Ordering::Relaxed);
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(source = key, "compilation cache hit");
            return Ok(entry.compiled.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(source = key, "compilation cache miss");
        let compiled = compile(key)?;

        let authoritative = {
            let tick = self.tick();
            let entry = self
                .entries
                .entry(Box::from(key))
                .or_insert_with(|| CacheEntry {
                    compiled,
                    last_used: AtomicU64::new(tick),
                });
            entry.last_used.store(tick, Ordering::Relaxed);
            entry.compiled.clone()
        };

        self.evict_if_needed();
        Ok(authoritative)
    }

    /// Drop least recently used entries until the cache fits its capacity.
    /// No map reference may be held by the caller.
    fn evict_if_needed(&self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        if self.entries.len() <= capacity.get() {
            return;
        }

        let _guard = self.evict_lock.lock();
        while self.entries.len() > capacity.get() {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.last_used.load(Ordering::Relaxed))
                .map(|entry| entry.key().clone());
            let Some(key) = oldest else {
                break;
            };
            if self.entries.remove(&key).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(source = &*key, "compilation cache evict");
            }
        }
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source.trim())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry and reset the statistics.
    pub fn clear(&self) {
        let _guard = self.evict_lock.lock();
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

impl Default for CompilationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompilationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompilationCache")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bounded(capacity: usize) -> CompilationCache {
        CompilationCache::with_capacity(NonZeroUsize::new(capacity))
    }

    #[test]
    fn test_hit_after_miss() {
        let cache = CompilationCache::new();
        cache.get_or_compile("1 + 1").unwrap();
        cache.get_or_compile("  1 + 1\n").unwrap();
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                evictions: 0,
                entries: 1,
            }
        );
        assert!(cache.contains("1 + 1 "));
    }

    #[test]
    fn test_failed_compile_writes_nothing() {
        let cache = CompilationCache::new();
        assert!(cache.get_or_compile("unknown_scope.x").is_err());
        assert!(cache.get_or_compile("1 +").is_err());
        assert!(cache.is_empty());
        assert!(!cache.contains("unknown_scope.x"));
    }

    #[test]
    fn test_lru_eviction() {
        let cache = bounded(2);
        cache.get_or_compile("1").unwrap();
        cache.get_or_compile("2").unwrap();
        // Touch "1" so "2" becomes the least recently used.
        cache.get_or_compile("1").unwrap();
        cache.get_or_compile("3").unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("1"));
        assert!(!cache.contains("2"));
        assert!(cache.contains("3"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_clear() {
        let cache = bounded(8);
        cache.get_or_compile("v.a").unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(cache.capacity(), NonZeroUsize::new(8));
    }
}
