//! Application wiring
//!
//! Builds the dependency graph from configuration: store backend (Redis or
//! in-process), repositories (PostgreSQL or in-memory), services, use cases,
//! and finally the router.

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::application::auth::{LoginUseCase, RegisterAccountUseCase, RequestPasswordResetUseCase};
use crate::application::referral::{ReferralAttributor, ReferralQueryService};
use crate::config::Config;
use crate::domain::auth::repositories::IAccountRepository;
use crate::domain::referral::repositories::IReferralRepository;
use crate::infrastructure::auth::{JwtService, PasswordHasher};
use crate::infrastructure::mail::TracingMailer;
use crate::infrastructure::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::infrastructure::repositories::{
    InMemoryAccountRepository, InMemoryReferralRepository, PostgresAccountRepository,
    PostgresReferralRepository,
};
use crate::infrastructure::store::{KeyValueStore, MemoryStore, RedisStore, StoreError};
use crate::presentation::routes;

/// Startup errors
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Store initialization failed: {0}")]
    Store(#[from] StoreError),

    #[error("Database initialization failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt_service: Arc<JwtService>,
    pub register_use_case: Arc<RegisterAccountUseCase>,
    pub login_use_case: Arc<LoginUseCase>,
    pub password_reset_use_case: Arc<RequestPasswordResetUseCase>,
    pub referral_queries: Arc<ReferralQueryService>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Wire the state from concrete backends. Used directly by tests with
    /// in-memory infrastructure.
    pub fn assemble(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        account_repository: Arc<dyn IAccountRepository>,
        referral_repository: Arc<dyn IReferralRepository>,
    ) -> Self {
        let config = Arc::new(config);
        let jwt_service = Arc::new(JwtService::new(
            config.auth.jwt_secret.clone(),
            config.auth.session_ttl_seconds,
            config.auth.reset_ttl_seconds,
        ));
        let password_hasher = Arc::new(PasswordHasher::new());
        let mailer = Arc::new(TracingMailer::new(config.mail.reset_base_url.clone()));
        let attributor = Arc::new(ReferralAttributor::new(
            account_repository.clone(),
            referral_repository.clone(),
        ));

        let rate_limiter = Arc::new(RateLimiter::new(
            store.clone(),
            RateLimiterConfig {
                window: Duration::from_secs(config.rate_limit.window_seconds),
                max_requests: config.rate_limit.max_requests,
            },
        ));

        Self {
            jwt_service: jwt_service.clone(),
            register_use_case: Arc::new(RegisterAccountUseCase::new(
                account_repository.clone(),
                password_hasher.clone(),
                jwt_service.clone(),
                attributor,
            )),
            login_use_case: Arc::new(LoginUseCase::new(
                account_repository.clone(),
                password_hasher,
                jwt_service.clone(),
            )),
            password_reset_use_case: Arc::new(RequestPasswordResetUseCase::new(
                account_repository,
                jwt_service,
                mailer,
            )),
            referral_queries: Arc::new(ReferralQueryService::new(referral_repository, store)),
            rate_limiter,
            config,
        }
    }
}

/// Build the application router from configuration
pub async fn create_app(config: Config) -> Result<Router, BootstrapError> {
    let store: Arc<dyn KeyValueStore> = match &config.store.url {
        Some(url) => {
            let timeout = Duration::from_secs(config.store.command_timeout_seconds);
            Arc::new(RedisStore::connect(url, timeout).await?)
        }
        None => {
            tracing::warn!("No store URL configured, using in-process store");
            Arc::new(MemoryStore::new())
        }
    };

    let (account_repository, referral_repository): (
        Arc<dyn IAccountRepository>,
        Arc<dyn IReferralRepository>,
    ) = match &config.database.url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            (
                Arc::new(PostgresAccountRepository::new(pool.clone())),
                Arc::new(PostgresReferralRepository::new(pool)),
            )
        }
        None => {
            tracing::warn!("No database URL configured, using in-memory repositories");
            let accounts = Arc::new(InMemoryAccountRepository::new());
            let referrals = Arc::new(InMemoryReferralRepository::new(accounts.clone()));
            (accounts, referrals)
        }
    };

    let state = AppState::assemble(config, store, account_repository, referral_repository);
    Ok(routes::create_router(state))
}
