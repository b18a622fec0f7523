//! Referral domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::auth::value_objects::AccountId;

/// Status of a recorded referral edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatus {
    /// The referral was recorded at registration time
    Successful,
}

impl FromStr for ReferralStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "successful" => Ok(ReferralStatus::Successful),
            _ => Err(format!("Unknown referral status: {}", s)),
        }
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferralStatus::Successful => write!(f, "successful"),
        }
    }
}

/// A recorded, immutable attribution event linking a referrer to a newly
/// registered account.
///
/// Invariant: at most one edge exists per `referred_account_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferralEdge {
    /// The account whose referral code was used
    pub referrer_id: AccountId,
    /// The newly registered account (unique per edge)
    pub referred_account_id: AccountId,
    /// Attribution status
    pub status: ReferralStatus,
    /// When the edge was recorded
    pub created_at: DateTime<Utc>,
}

impl ReferralEdge {
    /// Create a successful referral edge
    pub fn successful(referrer_id: AccountId, referred_account_id: AccountId) -> Self {
        Self {
            referrer_id,
            referred_account_id,
            status: ReferralStatus::Successful,
            created_at: Utc::now(),
        }
    }
}

/// Read model: a referral edge joined with the referred account's identity,
/// as served by the referral list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralRecord {
    /// The referred account's id
    pub referred_account_id: AccountId,
    /// The referred account's username
    pub username: String,
    /// The referred account's email
    pub email: String,
    /// Attribution status
    pub status: ReferralStatus,
    /// When the edge was recorded
    pub created_at: DateTime<Utc>,
}
