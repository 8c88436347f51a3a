//! # Castpulse Cache
//!
//! Generic TTL key→value cache with hit/miss metrics.
//!
//! Two independent instances exist in a running bot: a general-purpose
//! cache for API-derived statuses (5min TTL) and a short-TTL ban-status
//! cache (60s). Each instance has its own lock; locks are never nested.
//! Expired entries are evicted lazily on `get` and in bulk by
//! `cleanup_expired`, which the scheduler drives on a timer so memory
//! stays bounded even under low read traffic.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

/// Cache statistics snapshot for the observability surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Percentage in [0, 100], rounded to 2 decimals; 0 when no lookups yet.
    pub hit_rate: f64,
    pub size: usize,
}

struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

struct Inner<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    hits: u64,
    misses: u64,
}

/// TTL cache. An entry inserted at T is returned for lookups in
/// `[T, T+ttl)` and treated as absent from `T+ttl` on.
pub struct TtlCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                hits: 0,
                misses: 0,
            }),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(300)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        // A poisoned lock only means a panic mid-insert; the map is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get a value, counting a hit iff it is present and fresh. A stale
    /// entry is evicted and counted as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let mut inner = self.lock();
        let fresh = inner
            .entries
            .get(key)
            .map(|e| now - e.inserted_at < self.ttl);
        match fresh {
            Some(true) => {
                inner.hits += 1;
                inner.entries.get(key).map(|e| e.value.clone())
            }
            Some(false) => {
                inner.entries.remove(key);
                inner.misses += 1;
                None
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Insert or overwrite, stamping the current time.
    pub fn set(&self, key: K, value: V) {
        self.set_at(key, value, Utc::now());
    }

    pub fn set_at(&self, key: K, value: V, now: DateTime<Utc>) {
        self.lock().entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Remove a single entry.
    pub fn invalidate(&self, key: &K) {
        self.lock().entries.remove(key);
    }

    /// Remove everything. Metrics are kept.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Sweep all expired entries. Returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(Utc::now())
    }

    pub fn cleanup_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut inner = self.lock();
        let before = inner.entries.len();
        let ttl = self.ttl;
        inner.entries.retain(|_, e| now - e.inserted_at < ttl);
        let removed = before - inner.entries.len();
        if removed > 0 {
            tracing::debug!("Cache sweep removed {removed} expired entries");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let total = inner.hits + inner.misses;
        let hit_rate = if total > 0 {
            (inner.hits as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
        } else {
            0.0
        };
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            hit_rate,
            size: inner.entries.len(),
        }
    }
}
