//! Repository implementations

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryAccountRepository, InMemoryReferralRepository};
pub use postgres::{PostgresAccountRepository, PostgresReferralRepository};
