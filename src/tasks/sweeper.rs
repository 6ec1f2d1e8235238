//! Expiry Sweeper Task
//!
//! Background task that periodically removes expired cache entries, so keys
//! nobody reads again do not stay in memory.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Longer intervals are clamped so tick deadlines stay representable.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Spawns a background task that periodically reclaims expired cache entries.
///
/// Each pass takes the store lock once, scans every entry and releases the
/// lock after the scan. The task runs until `shutdown` is cancelled; a
/// cancellation that arrives while the task waits for its next tick ends it
/// immediately.
///
/// # Arguments
/// * `store` - Shared store, the same mutex the cache operations take
/// * `interval` - Time between sweep passes, must be non-zero
/// * `shutdown` - Token that stops the task
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::new(1000)?));
/// let token = CancellationToken::new();
/// let handle = spawn_sweeper(store.clone(), Duration::from_secs(1), token.clone());
/// // Later, during teardown:
/// token.cancel();
/// handle.await?;
/// ```
pub fn spawn_sweeper<K, V>(
    store: Arc<Mutex<CacheStore<K, V>>>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    let interval = interval.min(MAX_SWEEP_INTERVAL);

    tokio::spawn(async move {
        info!(interval = ?interval, "Starting expiry sweeper");

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Expiry sweeper: shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = {
                        let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
                        guard.purge_expired(Instant::now())
                    };

                    if removed > 0 {
                        debug!(removed, "Expiry sweep removed expired entries");
                    }
                }
            }
        }
    })
}
