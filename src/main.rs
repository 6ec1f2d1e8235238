//! TTL LRU Cache - demo walkthrough
//!
//! Fills a three-entry cache, shows a hit, a miss, an LRU eviction and a TTL
//! expiry, then prints the final statistics.

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru_cache::{Cache, CacheConfig};

/// Entry point for the cache demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables (capacity forced to 3)
/// 3. Fill the cache and exercise hit, miss, eviction and expiry
/// 4. Shut the sweeper down and print statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig {
        capacity: 3,
        ..CacheConfig::from_env()
    };
    info!(
        "Configuration loaded: capacity={}, sweep_interval={}ms, default_ttl={}s",
        config.capacity, config.sweep_interval_ms, config.default_ttl_secs
    );

    let cache = Cache::from_config(&config).context("failed to build cache")?;

    let ttl = config.default_ttl();
    cache.set("user:1", "Alice", ttl);
    cache.set("user:2", "Bob", Duration::from_secs(2));
    cache.set("user:3", "Charlie", ttl);
    info!("set 3 entries, cache size: {}", cache.len());

    for key in ["user:1", "user:2", "user:99"] {
        match cache.get(key) {
            Some(value) => info!("GET {key} -> {value} (hit)"),
            None => info!("GET {key} -> (miss)"),
        }
    }

    info!("adding user:4 (should evict LRU)...");
    cache.set("user:4", "Diana", ttl);
    info!("cache size: {}", cache.len());

    if cache.get("user:3").is_none() {
        info!("GET user:3 -> (miss, was evicted as LRU)");
    }

    info!("waiting 3s for user:2 TTL to expire...");
    tokio::time::sleep(Duration::from_secs(3)).await;

    if cache.get("user:2").is_none() {
        info!("GET user:2 -> (miss, expired)");
    }

    info!("final cache size: {}", cache.len());
    let stats = serde_json::to_string_pretty(&cache.stats())?;
    info!("final stats:\n{stats}");

    cache.shutdown().await;
    info!("demo done");
    Ok(())
}
