//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Cache misses are not
//! errors; only construction and configuration can fail.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must allow at least one entry
    #[error("Invalid capacity: cache must hold at least one entry")]
    InvalidCapacity,

    /// Sweep interval must be non-zero
    #[error("Invalid sweep interval: interval must be greater than zero")]
    InvalidSweepInterval,

    /// The sweeper needs a tokio runtime to be spawned on
    #[error("No tokio runtime: the cache must be constructed inside a runtime")]
    NoRuntime,

    /// Configuration value could not be used
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
