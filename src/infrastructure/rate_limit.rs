//! Distributed fixed-window rate limiter
//!
//! Backed by the shared key-value store so limits hold across instances.
//! The increment itself is the admission decision: there is no separate
//! read-then-write step, so two concurrent requests can never both slip
//! through the last slot of a window.

use std::sync::Arc;
use std::time::Duration;

use super::store::{KeyValueStore, StoreError};

/// Static rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Fixed window length
    pub window: Duration,
    /// Maximum admitted requests per identifier per window
    pub max_requests: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(900),
            max_requests: 100,
        }
    }
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request admitted; `remaining` slots left in the current window
    Admitted { remaining: u32 },
    /// Request rejected
    Limited,
}

/// Fixed-window rate limiter over the shared key-value store
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>, config: RateLimiterConfig) -> Self {
        Self { store, config }
    }

    fn key(identifier: &str) -> String {
        format!("rate-limit:{}", identifier)
    }

    /// Check and record one request for an identifier.
    ///
    /// The counter is incremented atomically with its window expiry; the
    /// returned count is compared against the limit. An over-limit request
    /// is rejected without decrementing — a fixed-window counter does not
    /// undo recorded requests. A store failure propagates so the caller can
    /// fail closed.
    pub async fn check(&self, identifier: &str) -> Result<RateLimitDecision, StoreError> {
        let count = self
            .store
            .increment_and_expire(&Self::key(identifier), self.config.window)
            .await?;

        if count > self.config.max_requests as i64 {
            tracing::warn!(identifier, count, "Rate limit exceeded");
            return Ok(RateLimitDecision::Limited);
        }

        Ok(RateLimitDecision::Admitted {
            remaining: self.config.max_requests.saturating_sub(count as u32),
        })
    }
}
