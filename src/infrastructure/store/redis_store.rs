//! Redis-backed key-value store
//!
//! Uses a multiplexed connection manager so concurrent request handlers
//! share one connection. The compound increment-and-expire runs as a
//! MULTI/EXEC pipeline with `EXPIRE .. NX`, so no caller can observe the
//! increment without the expiry, and later increments never extend the
//! window.

use async_trait::async_trait;
use redis::Client;
use redis::aio::ConnectionManager;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use super::{KeyValueStore, StoreError};

/// Redis key-value store
pub struct RedisStore {
    connection_manager: Arc<ConnectionManager>,
    command_timeout: Duration,
}

impl RedisStore {
    /// Connect to a Redis-compatible backend.
    ///
    /// # Arguments
    /// * `url` - Connection URL (e.g., "redis://127.0.0.1:6379")
    /// * `command_timeout` - Upper bound for any single command
    pub async fn connect(url: &str, command_timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            StoreError::Backend {
                message: format!("Failed to create Redis client: {}", e),
            }
        })?;

        let connection_manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to establish Redis connection: {}", e);
            StoreError::Backend {
                message: format!("Failed to establish Redis connection: {}", e),
            }
        })?;

        let store = Self {
            connection_manager: Arc::new(connection_manager),
            command_timeout,
        };

        // Verify the connection before handing the store out
        let mut conn = (*store.connection_manager).clone();
        store
            .bounded(redis::cmd("PING").query_async::<String>(&mut conn))
            .await?;
        debug!("Connected to Redis at {}", url);

        Ok(store)
    }

    /// Run a command future under the configured timeout. A timeout is a
    /// store failure, not a missing value.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = redis::RedisResult<T>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.command_timeout, fut).await {
            Ok(result) => result.map_err(|e| StoreError::Backend {
                message: format!("Redis error: {}", e),
            }),
            Err(_) => Err(StoreError::Timeout {
                timeout: self.command_timeout,
            }),
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = (*self.connection_manager).clone();
        self.bounded(
            redis::cmd("GET")
                .arg(key)
                .query_async::<Option<String>>(&mut conn),
        )
        .await
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut conn = (*self.connection_manager).clone();
        self.bounded(
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("EX")
                .arg(ttl.as_secs().max(1))
                .query_async::<String>(&mut conn),
        )
        .await?;
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = (*self.connection_manager).clone();
        self.bounded(redis::cmd("INCR").arg(key).query_async::<i64>(&mut conn))
            .await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = (*self.connection_manager).clone();
        self.bounded(
            redis::cmd("EXPIRE")
                .arg(key)
                .arg(ttl.as_secs().max(1))
                .query_async::<i64>(&mut conn),
        )
        .await?;
        Ok(())
    }

    async fn increment_and_expire(&self, key: &str, ttl: Duration) -> Result<i64, StoreError> {
        let mut conn = (*self.connection_manager).clone();

        // EXPIRE NX only sets a TTL when the key has none, which is exactly
        // the just-created case since every counter gets its TTL here.
        let (count, _expire_set) = self
            .bounded(
                redis::pipe()
                    .atomic()
                    .cmd("INCR")
                    .arg(key)
                    .cmd("EXPIRE")
                    .arg(key)
                    .arg(ttl.as_secs().max(1))
                    .arg("NX")
                    .query_async::<(i64, i64)>(&mut conn),
            )
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests require a running Redis-compatible instance and are run as
    // integration tests with a test container.

    #[tokio::test]
    #[ignore]
    async fn test_redis_increment_and_expire_window() {
        let store = RedisStore::connect("redis://127.0.0.1:6379", Duration::from_secs(2))
            .await
            .expect("Failed to connect");

        let key = "test:incr_expire";
        let ttl = Duration::from_secs(1);

        assert_eq!(store.increment_and_expire(key, ttl).await.unwrap(), 1);
        assert_eq!(store.increment_and_expire(key, ttl).await.unwrap(), 2);

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(store.increment_and_expire(key, ttl).await.unwrap(), 1);
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_set_get() {
        let store = RedisStore::connect("redis://127.0.0.1:6379", Duration::from_secs(2))
            .await
            .expect("Failed to connect");

        store
            .set_with_ttl("test:set_get", "value", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            store.get("test:set_get").await.unwrap(),
            Some("value".to_string())
        );
    }
}
