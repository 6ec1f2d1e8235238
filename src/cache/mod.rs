//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod concurrent;
mod entry;
mod list;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use concurrent::Cache;
pub use entry::CacheEntry;
pub use list::{NodeHandle, RecencyList};
pub use stats::CacheStats;
pub use store::CacheStore;
