//! Referral read queries with cache-aside
//!
//! Both referral reads go through the shared key-value store: hit returns
//! the cached payload, miss loads from the repository and writes the result
//! back with a short TTL. A failing store degrades the read to the loader
//! instead of failing the request; stale entries simply age out.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::auth::value_objects::AccountId;
use crate::domain::referral::{
    entities::ReferralRecord, errors::ReferralError, repositories::IReferralRepository,
};
use crate::infrastructure::store::KeyValueStore;

/// Cached TTL for referral reads
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Aggregate referral statistics for one referrer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralStats {
    /// Number of successful referrals recorded for this account
    pub successful_referrals: i64,
}

/// Read-side referral service
pub struct ReferralQueryService {
    referral_repository: Arc<dyn IReferralRepository>,
    store: Arc<dyn KeyValueStore>,
    cache_ttl: Duration,
}

impl ReferralQueryService {
    pub fn new(
        referral_repository: Arc<dyn IReferralRepository>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            referral_repository,
            store,
            cache_ttl: CACHE_TTL,
        }
    }

    #[cfg(test)]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// List the referrals recorded for an account
    pub async fn list_referrals(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<ReferralRecord>, ReferralError> {
        let key = format!("referrals:{}", account_id);
        self.read_through(&key, || {
            self.referral_repository.list_for_referrer(account_id)
        })
        .await
    }

    /// Aggregate referral statistics for an account
    pub async fn referral_stats(
        &self,
        account_id: &AccountId,
    ) -> Result<ReferralStats, ReferralError> {
        let key = format!("referral-stats:{}", account_id);
        self.read_through(&key, || async {
            let count = self.referral_repository.count_successful(account_id).await?;
            Ok(ReferralStats {
                successful_referrals: count,
            })
        })
        .await
    }

    /// Cache-aside read: store hit wins, miss runs the loader and writes the
    /// serialized result back. Store failures (and undecodable cached
    /// payloads) degrade to the loader.
    async fn read_through<T, F, Fut>(&self, key: &str, loader: F) -> Result<T, ReferralError>
    where
        T: Serialize + for<'de> Deserialize<'de>,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, ReferralError>>,
    {
        match self.store.get(key).await {
            Ok(Some(cached)) => match serde_json::from_str(&cached) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(key, "Discarding undecodable cache entry: {}", e);
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(key, "Cache read failed, falling back to repository: {}", e);
            }
        }

        let value = loader().await?;

        match serde_json::to_string(&value) {
            Ok(payload) => {
                if let Err(e) = self.store.set_with_ttl(key, &payload, self.cache_ttl).await {
                    tracing::warn!(key, "Cache write failed: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!(key, "Failed to serialize cache payload: {}", e);
            }
        }

        Ok(value)
    }
}
