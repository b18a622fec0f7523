//! Referral domain errors

use thiserror::Error;

/// Referral attribution errors
///
/// Each variant corresponds to one short-circuiting step of the attribution
/// validation sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferralError {
    #[error("Invalid referral code")]
    InvalidCode,

    #[error("Cannot use your own referral code")]
    SelfReferral,

    #[error("Referral code has expired")]
    CodeExpired,

    #[error("Database error: {message}")]
    DatabaseError { message: String },
}
