//! In-process TTL cache for expensive upstream computations.
//!
//! The cache stores each value alongside its insertion time and applies the
//! freshness window at read time, so two callers may apply different TTLs to
//! the same key. Expired entries are treated as absent but are only removed
//! by being overwritten; there is no background sweeper.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    inserted_at: Instant,
    value: V,
}

/// Concurrent key/value cache with read-time expiry.
///
/// Values are cloned out on read, so `V` is expected to be cheap to clone
/// (or wrapped in an `Arc`). The cache is an accelerator, not a source of
/// truth: a miss only costs a recomputation.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key` when it is younger than `ttl`.
    ///
    /// The TTL is supplied by the caller rather than stored with the entry;
    /// an entry older than `ttl` is reported as absent without being removed.
    #[must_use]
    pub fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;
        if entry.inserted_at.elapsed() < ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Inserts or overwrites the entry for `key`, stamping it with the
    /// current time.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.into(),
            CacheEntry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }
}
