//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with recency ordering and TTL expiration.
//! The store is not synchronised; [`crate::cache::Cache`] wraps it in a single mutex.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, RecencyList};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Cache storage with LRU eviction and TTL support.
///
/// Every entry in `entries` has exactly one node in `order` holding its key,
/// and the entry's handle points at that node.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Keys from most to least recently used
    order: RecencyList<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity);
        }
        Ok(Self {
            entries: HashMap::new(),
            order: RecencyList::new(),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Set ==
    /// Stores a key-value pair that expires `ttl` after `now`.
    ///
    /// If the key already exists, the value is overwritten, the TTL restarts and
    /// the key becomes most recently used; nothing is evicted. Otherwise, if the
    /// cache is full, the least recently used entry is evicted first.
    ///
    /// Returns the evicted key, if any.
    pub fn set(&mut self, key: K, value: V, ttl: Duration, now: Instant) -> Option<K> {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.refresh(value, ttl, now);
            self.order.move_to_front(entry.handle);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_lru()
        } else {
            None
        };

        let handle = self.order.push_front(key.clone());
        self.entries
            .insert(key, CacheEntry::new(value, ttl, now, handle));
        self.stats.set_total_entries(self.entries.len());

        evicted
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A live hit becomes most recently used. An expired entry is removed and
    /// reported as a miss.
    pub fn get<Q>(&mut self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired(now) {
            self.expire(key);
            self.stats.record_miss();
            return None;
        }

        let value = entry.value.clone();
        self.order.move_to_front(entry.handle);
        self.stats.record_hit();
        Some(value)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was still live.
    pub fn remove<Q>(&mut self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.detach(key)?;
        if entry.is_expired(now) {
            self.stats.record_expirations(1);
            return None;
        }
        Some(entry.value)
    }

    /// Checks for a live entry without touching recency or reclaiming it.
    pub fn contains_key<Q>(&self, key: &Q, now: Instant) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Remaining TTL of a live entry.
    pub fn ttl<Q>(&self, key: &Q, now: Instant) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .and_then(|entry| entry.ttl_remaining(now))
    }

    // == Purge Expired ==
    /// Removes all entries expired at `now` in a single pass.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let order = &mut self.order;

        self.entries.retain(|key, entry| {
            if entry.is_expired(now) {
                debug!(key = ?key, "sweeper reclaimed expired entry");
                order.remove(entry.handle);
                false
            } else {
                true
            }
        });

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    /// Drops every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the number of stored entries, including expired entries that
    /// have not been reclaimed yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.order.iter().cloned().collect()
    }

    // Evicts the back of the recency list. Caller holds the lock.
    fn evict_lru(&mut self) -> Option<K> {
        let key = self.order.pop_back()?;
        self.entries.remove(&key);
        self.stats.record_eviction();
        debug!(key = ?key, "evicted least recently used entry");
        Some(key)
    }

    fn expire<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(entry) = self.entries.remove(key) {
            if let Some(stored) = self.order.remove(entry.handle) {
                debug!(key = ?stored, "expired entry removed on read");
            }
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
        }
    }

    fn detach<Q>(&mut self, key: &Q) -> Option<CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(key)?;
        self.order.remove(entry.handle);
        self.stats.set_total_entries(self.entries.len());
        Some(entry)
    }

    /// Panics if the table and the recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.entries.len(), self.order.len(), "table/list size mismatch");
        assert!(self.entries.len() <= self.capacity, "capacity exceeded");
        for (key, entry) in &self.entries {
            assert_eq!(
                self.order.get(entry.handle),
                Some(key),
                "handle for {key:?} points at the wrong node"
            );
        }
    }
}
