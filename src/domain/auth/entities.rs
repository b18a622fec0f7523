//! Authentication domain entities

use chrono::{DateTime, Utc};

use super::value_objects::*;

/// Account aggregate root
///
/// Accounts are created once and are otherwise immutable, apart from
/// `referred_by` which is set at most once during referral attribution.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account identifier
    pub account_id: AccountId,
    /// Account email address (globally unique)
    pub email: Email,
    /// Account username (globally unique)
    pub username: Username,
    /// Hashed password (never expose raw hash)
    pub password_hash: PasswordHash,
    /// This account's own referral code, if one was issued
    pub referral_code: Option<ReferralCode>,
    /// When the referral code stops being usable by other registrations
    pub code_expires_at: Option<DateTime<Utc>>,
    /// The account that referred this one (set at most once, never self)
    pub referred_by: Option<AccountId>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a freshly issued referral code
    pub fn new(
        account_id: AccountId,
        email: Email,
        username: Username,
        password_hash: PasswordHash,
        referral_code: ReferralCode,
        code_expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id,
            email,
            username,
            password_hash,
            referral_code: Some(referral_code),
            code_expires_at: Some(code_expires_at),
            referred_by: None,
            created_at: Utc::now(),
        }
    }

    /// Check whether this account's referral code has expired
    pub fn referral_code_expired(&self, now: DateTime<Utc>) -> bool {
        match self.code_expires_at {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }
}
