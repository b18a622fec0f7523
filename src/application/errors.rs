//! Application layer errors

use thiserror::Error;

use crate::domain::auth::errors::AuthError;
use crate::domain::referral::errors::ReferralError;
use crate::infrastructure::mail::MailError;
use crate::infrastructure::store::StoreError;

/// Application errors aggregated across the domain and infrastructure
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Referral(#[from] ReferralError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}
