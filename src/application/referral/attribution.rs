//! Referral attribution
//!
//! Runs at registration time, after the new account exists. Validation
//! short-circuits in a fixed order: unknown code, self-referral, expired
//! code. A passing code results in one conditional edge write plus the
//! back-pointer on the referred account.

use std::sync::Arc;

use crate::domain::auth::{
    entities::Account, errors::AuthError, repositories::IAccountRepository,
    value_objects::AccountId,
};
use crate::domain::referral::{
    entities::ReferralEdge, errors::ReferralError, repositories::IReferralRepository,
};

/// Attributes new registrations to the referrer whose code they carried
pub struct ReferralAttributor {
    account_repository: Arc<dyn IAccountRepository>,
    referral_repository: Arc<dyn IReferralRepository>,
}

impl ReferralAttributor {
    pub fn new(
        account_repository: Arc<dyn IAccountRepository>,
        referral_repository: Arc<dyn IReferralRepository>,
    ) -> Self {
        Self {
            account_repository,
            referral_repository,
        }
    }

    /// Attribute a newly registered account to the owner of `code`.
    ///
    /// Returns the referrer's id on success. The caller is expected to have
    /// already skipped attribution entirely when no code was supplied.
    pub async fn attribute(
        &self,
        new_account: &Account,
        code: &str,
    ) -> Result<AccountId, ReferralError> {
        let referrer = self
            .account_repository
            .find_by_referral_code(code)
            .await
            .map_err(auth_to_referral)?
            .ok_or(ReferralError::InvalidCode)?;

        let own_code = new_account
            .referral_code
            .as_ref()
            .is_some_and(|c| c.as_str() == code);
        if referrer.account_id == new_account.account_id || own_code {
            return Err(ReferralError::SelfReferral);
        }

        if referrer.referral_code_expired(chrono::Utc::now()) {
            return Err(ReferralError::CodeExpired);
        }

        let edge = ReferralEdge::successful(referrer.account_id, new_account.account_id);
        let created = self.referral_repository.create_edge(&edge).await?;
        if !created {
            // A concurrent registration of the same account already won the
            // conditional write; the invariant holds either way.
            tracing::debug!(
                referred_account_id = %new_account.account_id,
                "Referral edge already recorded"
            );
        }

        self.account_repository
            .set_referred_by(&new_account.account_id, &referrer.account_id)
            .await
            .map_err(auth_to_referral)?;

        tracing::info!(
            referrer_id = %referrer.account_id,
            referred_account_id = %new_account.account_id,
            "Referral attributed"
        );
        Ok(referrer.account_id)
    }
}

fn auth_to_referral(e: AuthError) -> ReferralError {
    ReferralError::DatabaseError {
        message: e.to_string(),
    }
}
