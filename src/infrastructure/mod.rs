//! Infrastructure layer: external service adapters
//!
//! Concrete implementations of the domain's repository and service traits:
//! JWT and password hashing, the shared key-value store (Redis or in-memory),
//! persistence (PostgreSQL or in-memory), rate limiting, and outbound mail.

pub mod auth;
pub mod mail;
pub mod rate_limit;
pub mod repositories;
pub mod store;

pub use auth::{JwtService, PasswordHasher, TokenClass};
pub use mail::{MailError, Mailer, TracingMailer};
pub use rate_limit::{RateLimitDecision, RateLimiter, RateLimiterConfig};
pub use store::{KeyValueStore, MemoryStore, RedisStore, StoreError};
