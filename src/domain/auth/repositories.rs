//! Account repository trait

use async_trait::async_trait;

use super::entities::Account;
use super::errors::AuthError;
use super::value_objects::{AccountId, Email, Username};

/// Account repository trait for account persistence
///
/// Implementations must enforce uniqueness of email, username, and referral
/// code; a unique-constraint violation on create maps to
/// [`AuthError::IdentityTaken`].
#[async_trait]
pub trait IAccountRepository: Send + Sync {
    /// Find an account by email address
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AuthError>;

    /// Find an account by username
    async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AuthError>;

    /// Find an account matching either email or username (login identifier)
    async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, AuthError>;

    /// Find an account by account ID
    async fn find_by_id(&self, account_id: &AccountId) -> Result<Option<Account>, AuthError>;

    /// Find the account owning a referral code
    async fn find_by_referral_code(&self, code: &str) -> Result<Option<Account>, AuthError>;

    /// Create a new account
    async fn create(&self, account: &Account) -> Result<(), AuthError>;

    /// Record which account referred this one (set at most once)
    async fn set_referred_by(
        &self,
        account_id: &AccountId,
        referrer_id: &AccountId,
    ) -> Result<(), AuthError>;
}
