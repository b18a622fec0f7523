//! Referral repository trait

use async_trait::async_trait;

use super::entities::{ReferralEdge, ReferralRecord};
use super::errors::ReferralError;
use crate::domain::auth::value_objects::AccountId;

/// Referral repository trait for referral edge persistence
#[async_trait]
pub trait IReferralRepository: Send + Sync {
    /// Conditionally create a referral edge.
    ///
    /// The write is keyed by `referred_account_id`: if an edge already exists
    /// for that account, nothing is written and `Ok(false)` is returned. This
    /// is the single conditional write that guarantees the at-most-one-edge
    /// invariant under concurrent registrations.
    async fn create_edge(&self, edge: &ReferralEdge) -> Result<bool, ReferralError>;

    /// List all edges recorded for a referrer, joined with the referred
    /// account's username and email.
    async fn list_for_referrer(
        &self,
        referrer_id: &AccountId,
    ) -> Result<Vec<ReferralRecord>, ReferralError>;

    /// Count successful referrals recorded for a referrer
    async fn count_successful(&self, referrer_id: &AccountId) -> Result<i64, ReferralError>;
}
