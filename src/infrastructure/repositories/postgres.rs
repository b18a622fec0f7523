//! PostgreSQL repository implementations
//!
//! Schema lives in `migrations/`. Uniqueness of email, username, and
//! referral code is enforced by database constraints; the one-edge-per
//! referred-account invariant is enforced with `ON CONFLICT DO NOTHING`
//! on the edge's unique key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::auth::{
    entities::Account,
    errors::AuthError,
    repositories::IAccountRepository,
    value_objects::{AccountId, Email, PasswordHash, ReferralCode, Username},
};
use crate::domain::referral::{
    entities::{ReferralEdge, ReferralRecord, ReferralStatus},
    errors::ReferralError,
    repositories::IReferralRepository,
};

const ACCOUNT_COLUMNS: &str = "account_id, email, username, password_hash, referral_code, \
     code_expires_at, referred_by, created_at";

fn row_to_account(row: &PgRow) -> Result<Account, sqlx::Error> {
    let email: String = row.try_get("email")?;
    let username: String = row.try_get("username")?;
    let referral_code: Option<String> = row.try_get("referral_code")?;

    Ok(Account {
        account_id: AccountId::new(row.try_get::<Uuid, _>("account_id")?),
        email: Email::new(email).map_err(|e| sqlx::Error::Decode(e.into()))?,
        username: Username::new(username).map_err(|e| sqlx::Error::Decode(e.into()))?,
        password_hash: PasswordHash::new(row.try_get("password_hash")?),
        referral_code: referral_code
            .map(ReferralCode::new)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(e.into()))?,
        code_expires_at: row.try_get::<Option<DateTime<Utc>>, _>("code_expires_at")?,
        referred_by: row
            .try_get::<Option<Uuid>, _>("referred_by")?
            .map(AccountId::new),
        created_at: row.try_get("created_at")?,
    })
}

fn auth_db_error(e: sqlx::Error) -> AuthError {
    tracing::error!("Database error: {}", e);
    AuthError::DatabaseError {
        message: e.to_string(),
    }
}

fn referral_db_error(e: sqlx::Error) -> ReferralError {
    tracing::error!("Database error: {}", e);
    ReferralError::DatabaseError {
        message: e.to_string(),
    }
}

/// Unique constraint violations surface as a distinct error so account
/// creation can report a taken identity instead of a server failure.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(
        e.as_database_error().and_then(|db| db.code()),
        Some(code) if code == "23505"
    )
}

/// PostgreSQL account repository
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(
        &self,
        condition: &str,
        bind: &str,
    ) -> Result<Option<Account>, AuthError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE {}",
            ACCOUNT_COLUMNS, condition
        );
        let row = sqlx::query(&query)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await
            .map_err(auth_db_error)?;

        row.as_ref()
            .map(row_to_account)
            .transpose()
            .map_err(auth_db_error)
    }
}

#[async_trait]
impl IAccountRepository for PostgresAccountRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AuthError> {
        self.fetch_one_by("email = $1", email.as_str()).await
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AuthError> {
        self.fetch_one_by("username = $1", username.as_str()).await
    }

    async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE email = $1 OR username = $2",
            ACCOUNT_COLUMNS
        ))
        .bind(identifier.to_lowercase())
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(auth_db_error)?;

        row.as_ref()
            .map(row_to_account)
            .transpose()
            .map_err(auth_db_error)
    }

    async fn find_by_id(&self, account_id: &AccountId) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE account_id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(auth_db_error)?;

        row.as_ref()
            .map(row_to_account)
            .transpose()
            .map_err(auth_db_error)
    }

    async fn find_by_referral_code(&self, code: &str) -> Result<Option<Account>, AuthError> {
        self.fetch_one_by("referral_code = $1", code).await
    }

    async fn create(&self, account: &Account) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO accounts \
             (account_id, email, username, password_hash, referral_code, code_expires_at, \
              referred_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(account.username.as_str())
        .bind(account.password_hash.as_str())
        .bind(account.referral_code.as_ref().map(|c| c.as_str()))
        .bind(account.code_expires_at)
        .bind(account.referred_by.map(|id| id.as_uuid()))
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::IdentityTaken
            } else {
                auth_db_error(e)
            }
        })?;
        Ok(())
    }

    async fn set_referred_by(
        &self,
        account_id: &AccountId,
        referrer_id: &AccountId,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE accounts SET referred_by = $2 \
             WHERE account_id = $1 AND referred_by IS NULL",
        )
        .bind(account_id.as_uuid())
        .bind(referrer_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(auth_db_error)?;

        if result.rows_affected() == 0 {
            tracing::debug!(%account_id, "referred_by already set or account missing");
        }
        Ok(())
    }
}

/// PostgreSQL referral repository
pub struct PostgresReferralRepository {
    pool: PgPool,
}

impl PostgresReferralRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IReferralRepository for PostgresReferralRepository {
    async fn create_edge(&self, edge: &ReferralEdge) -> Result<bool, ReferralError> {
        // The unique index on referred_account_id makes this the single
        // atomic decision point for concurrent attributions.
        let result = sqlx::query(
            "INSERT INTO referral_edges (referrer_id, referred_account_id, status, created_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (referred_account_id) DO NOTHING",
        )
        .bind(edge.referrer_id.as_uuid())
        .bind(edge.referred_account_id.as_uuid())
        .bind(edge.status.to_string())
        .bind(edge.created_at)
        .execute(&self.pool)
        .await
        .map_err(referral_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_referrer(
        &self,
        referrer_id: &AccountId,
    ) -> Result<Vec<ReferralRecord>, ReferralError> {
        let rows = sqlx::query(
            "SELECT e.referred_account_id, a.username, a.email, e.status, e.created_at \
             FROM referral_edges e \
             JOIN accounts a ON a.account_id = e.referred_account_id \
             WHERE e.referrer_id = $1 \
             ORDER BY e.created_at DESC",
        )
        .bind(referrer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(referral_db_error)?;

        rows.iter()
            .map(|row| {
                let status: String = row.try_get("status")?;
                Ok(ReferralRecord {
                    referred_account_id: AccountId::new(
                        row.try_get::<Uuid, _>("referred_account_id")?,
                    ),
                    username: row.try_get("username")?,
                    email: row.try_get("email")?,
                    status: status
                        .parse::<ReferralStatus>()
                        .map_err(|e| sqlx::Error::Decode(e.into()))?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(referral_db_error)
    }

    async fn count_successful(&self, referrer_id: &AccountId) -> Result<i64, ReferralError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM referral_edges \
             WHERE referrer_id = $1 AND status = 'successful'",
        )
        .bind(referrer_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(referral_db_error)?;

        row.try_get("count").map_err(referral_db_error)
    }
}
