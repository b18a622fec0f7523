//! Authentication use cases
//!
//! One struct per operation, wired with `Arc`ed collaborators so the handlers
//! stay thin. Registration owns the ordering quirk that matters here: the
//! account is persisted before referral attribution runs, so a failed
//! attribution rejects the request but leaves the account in place.

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::application::errors::ApplicationError;
use crate::application::referral::attribution::ReferralAttributor;
use crate::domain::auth::{
    entities::Account,
    errors::AuthError,
    repositories::IAccountRepository,
    value_objects::{AccountId, Email, Password, ReferralCode, Username},
};
use crate::infrastructure::auth::{JwtService, PasswordHasher, TokenClass};
use crate::infrastructure::mail::Mailer;

/// How long a freshly issued referral code stays usable
const REFERRAL_CODE_TTL_DAYS: i64 = 30;

/// Register a new account, optionally attributing it to a referrer
pub struct RegisterAccountUseCase {
    account_repository: Arc<dyn IAccountRepository>,
    password_hasher: Arc<PasswordHasher>,
    jwt_service: Arc<JwtService>,
    attributor: Arc<ReferralAttributor>,
}

/// Registration input, taken verbatim from the request body
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
    pub referral_code: Option<String>,
}

impl RegisterAccountUseCase {
    pub fn new(
        account_repository: Arc<dyn IAccountRepository>,
        password_hasher: Arc<PasswordHasher>,
        jwt_service: Arc<JwtService>,
        attributor: Arc<ReferralAttributor>,
    ) -> Self {
        Self {
            account_repository,
            password_hasher,
            jwt_service,
            attributor,
        }
    }

    /// Execute registration, returning a session token
    pub async fn execute(&self, input: RegisterInput) -> Result<String, ApplicationError> {
        if input.email.trim().is_empty()
            || input.username.trim().is_empty()
            || input.password.is_empty()
        {
            return Err(AuthError::MissingFields.into());
        }

        let email = Email::new(input.email).map_err(|_| AuthError::InvalidEmail)?;
        let username =
            Username::new(input.username).map_err(|reason| AuthError::InvalidUsername { reason })?;
        let password = Password::new(input.password).map_err(|_| AuthError::WeakPassword)?;

        let password_hash = self.password_hasher.hash(password.into_string()).await?;

        let account = Account::new(
            AccountId::generate(),
            email,
            username,
            password_hash,
            ReferralCode::generate(),
            Utc::now() + Duration::days(REFERRAL_CODE_TTL_DAYS),
        );
        self.account_repository.create(&account).await?;
        tracing::info!(account_id = %account.account_id, "Account registered");

        // Attribution runs after the account exists. A rejected code fails
        // the request but the account above stays persisted.
        if let Some(code) = input
            .referral_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            self.attributor.attribute(&account, code).await?;
        }

        let token = self
            .jwt_service
            .issue(account.account_id, TokenClass::Session)?;
        Ok(token)
    }
}

/// Authenticate an existing account by email or username
pub struct LoginUseCase {
    account_repository: Arc<dyn IAccountRepository>,
    password_hasher: Arc<PasswordHasher>,
    jwt_service: Arc<JwtService>,
}

impl LoginUseCase {
    pub fn new(
        account_repository: Arc<dyn IAccountRepository>,
        password_hasher: Arc<PasswordHasher>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            account_repository,
            password_hasher,
            jwt_service,
        }
    }

    /// Execute login, returning a session token.
    ///
    /// Unknown identifier and wrong password produce the same error, so the
    /// response never reveals whether the account exists.
    pub async fn execute(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<String, ApplicationError> {
        if identifier.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields.into());
        }

        let account = self
            .account_repository
            .find_by_email_or_username(identifier)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = self
            .password_hasher
            .verify(password.to_string(), account.password_hash.clone())
            .await?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self
            .jwt_service
            .issue(account.account_id, TokenClass::Session)?;
        tracing::info!(account_id = %account.account_id, "Login succeeded");
        Ok(token)
    }
}

/// Issue a short-lived password reset token and mail it out
pub struct RequestPasswordResetUseCase {
    account_repository: Arc<dyn IAccountRepository>,
    jwt_service: Arc<JwtService>,
    mailer: Arc<dyn Mailer>,
}

impl RequestPasswordResetUseCase {
    pub fn new(
        account_repository: Arc<dyn IAccountRepository>,
        jwt_service: Arc<JwtService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            account_repository,
            jwt_service,
            mailer,
        }
    }

    /// Execute the reset request.
    ///
    /// An unknown email is reported as not found; this endpoint deliberately
    /// keeps that behavior rather than answering uniformly. A malformed email
    /// cannot belong to any account, so it is not found either.
    pub async fn execute(&self, email: &str) -> Result<(), ApplicationError> {
        if email.trim().is_empty() {
            return Err(AuthError::MissingFields.into());
        }

        let email = Email::new(email.to_string()).map_err(|_| AuthError::AccountNotFound)?;
        let account = self
            .account_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let reset_token = self
            .jwt_service
            .issue(account.account_id, TokenClass::Reset)?;
        self.mailer.send_reset(&account.email, &reset_token).await?;

        tracing::info!(account_id = %account.account_id, "Password reset requested");
        Ok(())
    }
}
