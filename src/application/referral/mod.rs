//! Referral attribution and read queries

pub mod attribution;
pub mod queries;

pub use attribution::ReferralAttributor;
pub use queries::{ReferralQueryService, ReferralStats};
