//! In-process key-value store
//!
//! Used for tests and single-instance deployments without a Redis backend.
//! All compound operations run under one mutex acquisition, which gives the
//! same atomicity the Redis implementation gets from MULTI/EXEC.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::{KeyValueStore, StoreError};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }
}

/// In-memory key-value store with per-entry expiry
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop an entry if its deadline has passed; returns true when the key
    /// is live afterwards.
    fn prune(entries: &mut HashMap<String, Entry>, key: &str, now: Instant) -> bool {
        match entries.get(key) {
            Some(entry) if entry.expired(now) => {
                entries.remove(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        let now = Instant::now();
        if !Self::prune(&mut entries, key, now) {
            return Ok(None);
        }
        Ok(entries.get(key).map(|e| e.value.clone()))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        let now = Instant::now();
        Self::prune(&mut entries, key, now);

        let entry = entries.entry(key.to_string()).or_insert(Entry {
            value: "0".to_string(),
            expires_at: None,
        });
        let count = entry.value.parse::<i64>().map_err(|e| StoreError::Backend {
            message: format!("Counter value is not an integer: {}", e),
        })? + 1;
        entry.value = count.to_string();
        Ok(count)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn increment_and_expire(&self, key: &str, ttl: Duration) -> Result<i64, StoreError> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        let now = Instant::now();
        let existed = Self::prune(&mut entries, key, now);

        let entry = entries.entry(key.to_string()).or_insert(Entry {
            value: "0".to_string(),
            expires_at: None,
        });
        let count = entry.value.parse::<i64>().map_err(|e| StoreError::Backend {
            message: format!("Counter value is not an integer: {}", e),
        })? + 1;
        entry.value = count.to_string();

        // The window starts when the counter is created, never when it is
        // incremented.
        if !existed {
            entry.expires_at = Some(now + ttl);
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .set_with_ttl("k", "v", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let store = MemoryStore::new();
        store
            .set_with_ttl("k", "v", Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_increment_creates_at_one() {
        let store = MemoryStore::new();
        assert_eq!(store.increment("c").await.unwrap(), 1);
        assert_eq!(store.increment("c").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_increment_and_expire_sets_ttl_only_on_creation() {
        let store = MemoryStore::new();
        let ttl = Duration::from_millis(60);

        assert_eq!(store.increment_and_expire("c", ttl).await.unwrap(), 1);
        tokio::time::sleep(Duration::from_millis(40)).await;
        // This increment must not push the deadline out
        assert_eq!(store.increment_and_expire("c", ttl).await.unwrap(), 2);
        tokio::time::sleep(Duration::from_millis(40)).await;

        // The original deadline has elapsed; the counter resets
        assert_eq!(store.increment_and_expire("c", ttl).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_counters_are_independent() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);
        store.increment_and_expire("a", ttl).await.unwrap();
        store.increment_and_expire("a", ttl).await.unwrap();
        assert_eq!(store.increment_and_expire("b", ttl).await.unwrap(), 1);
    }
}
