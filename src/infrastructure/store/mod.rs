//! Key-value store contract shared by the rate limiter and the cache-aside
//! read path.
//!
//! The store is the only shared mutable state between concurrent request
//! handlers; all cross-request coordination is delegated to the atomicity of
//! these operations. Implementations must treat every call as a bounded
//! interaction: a timed-out call is a [`StoreError`], never a missing value.

pub mod memory_store;
pub mod redis_store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Key-value store errors
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Store backend error: {message}")]
    Backend { message: String },

    #[error("Store operation timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Abstract key-value store with atomic increment and expiry.
///
/// `increment_and_expire` is the load-bearing operation: the increment and
/// the expiry must execute as a single atomic unit, and the expiry is applied
/// only when the increment created the key. Without that, a counter could
/// persist forever after a burst (expiry lost) or have its window silently
/// extended by later increments.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the raw value for a key, if present and unexpired
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set a value with a time-to-live
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration)
    -> Result<(), StoreError>;

    /// Increment a counter, creating it at 1 if absent; returns the new count
    async fn increment(&self, key: &str) -> Result<i64, StoreError>;

    /// Set a time-to-live on an existing key
    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Atomically increment a counter and, only when the increment created
    /// the key, set its time-to-live. Returns the new count.
    async fn increment_and_expire(&self, key: &str, ttl: Duration) -> Result<i64, StoreError>;
}
