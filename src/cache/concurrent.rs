//! Thread-safe cache handle.
//!
//! [`Cache`] owns a [`CacheStore`] behind one mutex and the background task that
//! sweeps it. Every operation takes the lock once for its whole duration, so the
//! entry table and the recency list always change together.
//!
//! # Teardown
//!
//! The sweeper runs until the cache is stopped. Call [`Cache::shutdown`] to stop
//! it and wait for it, or [`Cache::stop`] to only signal it. Dropping the cache
//! also signals the sweeper, which exits at its next wake-up.

use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweeper;

/// Bounded, thread-safe cache with TTL expiration and strict LRU eviction.
///
/// Share it between tasks or threads with `Arc<Cache<K, V>>`.
///
/// # Example
/// ```no_run
/// # async fn demo() -> ttl_lru_cache::error::Result<()> {
/// use std::time::Duration;
/// use ttl_lru_cache::Cache;
///
/// let cache = Cache::new(3, Duration::from_secs(1))?;
/// cache.set("user:1", "Alice", Duration::from_secs(5));
/// assert_eq!(cache.get("user:1"), Some("Alice"));
/// cache.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Cache<K, V> {
    store: Arc<Mutex<CacheStore<K, V>>>,
    shutdown: CancellationToken,
    sweeper: Option<JoinHandle<()>>,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries and starts a sweeper
    /// that reclaims expired entries every `sweep_interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(capacity: usize, sweep_interval: Duration) -> Result<Self> {
        if sweep_interval.is_zero() {
            return Err(CacheError::InvalidSweepInterval);
        }
        let store = Arc::new(Mutex::new(CacheStore::new(capacity)?));
        Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let shutdown = CancellationToken::new();
        let sweeper = spawn_sweeper(store.clone(), sweep_interval, shutdown.clone());

        Ok(Self {
            store,
            shutdown,
            sweeper: Some(sweeper),
        })
    }

    /// Creates a cache from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity, config.sweep_interval())
    }

    // == Set ==
    /// Inserts or refreshes `key`, evicting the least recently used entry if a
    /// new key arrives while the cache is full.
    ///
    /// A zero `ttl` stores an entry that is already expired.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        self.lock().set(key, value, ttl, Instant::now());
    }

    // == Get ==
    /// Returns a clone of the live value for `key` and marks it most recently used.
    ///
    /// An expired entry is removed by this call and reported as `None`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().get(key, Instant::now())
    }

    /// Removes `key`, returning its value if it had not expired.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().remove(key, Instant::now())
    }

    /// Checks for a live entry without changing its recency.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().contains_key(key, Instant::now())
    }

    /// Remaining time to live for a live entry.
    pub fn ttl<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().ttl(key, Instant::now())
    }

    // == Length ==
    /// Number of stored entries.
    ///
    /// Expired entries count until a read or a sweep reclaims them; call
    /// [`Cache::purge_expired`] first for a live count.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Runs one sweep pass now. Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        self.lock().purge_expired(Instant::now())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.lock().keys_by_recency()
    }
}

impl<K, V> Cache<K, V> {
    // == Stop ==
    /// Signals the sweeper to exit without waiting for it.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Stops the sweeper and waits for it to finish.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(sweeper) = self.sweeper.take() {
            if let Err(e) = sweeper.await {
                warn!(error = %e, "Cache sweeper ended abnormally");
            }
        }
        info!("Cache shut down");
    }

    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper
            .as_ref()
            .is_some_and(|sweeper| !sweeper.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, CacheStore<K, V>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Drop for Cache<K, V> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
