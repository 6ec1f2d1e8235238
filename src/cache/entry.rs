//! Cache Entry Module
//!
//! Defines the table-side record for a cached value with TTL support.

use std::time::Duration;

use tokio::time::Instant;

use crate::cache::NodeHandle;

// == Cache Entry ==
/// A single cache entry: the value, its deadline and its place in the recency list.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration deadline, None = the deadline overflowed the clock
    pub expires_at: Option<Instant>,
    /// Where the entry's key sits in the recency list
    pub(crate) handle: NodeHandle,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` after `now`.
    pub(crate) fn new(value: V, ttl: Duration, now: Instant, handle: NodeHandle) -> Self {
        Self {
            value,
            expires_at: deadline(now, ttl),
            handle,
        }
    }

    /// Replaces the value and restarts the TTL from `now`.
    pub(crate) fn refresh(&mut self, value: V, ttl: Duration, now: Instant) {
        self.value = value;
        self.expires_at = deadline(now, ttl);
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: the entry is expired once `now` reaches the
    /// deadline, so a zero TTL yields an entry that is already expired.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining TTL, or None if the entry never expires.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the TTL has elapsed
    /// - `Some(remaining)` if the TTL hasn't elapsed
    /// - `None` if the entry has no deadline
    pub fn ttl_remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(now))
    }
}

fn deadline(now: Instant, ttl: Duration) -> Option<Instant> {
    now.checked_add(ttl)
}
