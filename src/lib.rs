//! TTL LRU Cache - A bounded in-process cache
//!
//! Combines a hash table with a recency list for O(1) get, set and eviction,
//! with lazy (on read) and background (sweeper) TTL expiration.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats};
pub use config::CacheConfig;
pub use error::CacheError;
