//! Shared integration test harness
#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use refgate::app::AppState;
use refgate::config::Config;
use refgate::infrastructure::repositories::{
    InMemoryAccountRepository, InMemoryReferralRepository,
};
use refgate::infrastructure::store::{KeyValueStore, MemoryStore, StoreError};
use refgate::presentation::routes;

/// A fully wired application over in-memory infrastructure, with handles to
/// the backends so tests can inspect and seed state the API does not expose.
pub struct TestApp {
    pub router: Router,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub store: Arc<dyn KeyValueStore>,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(Config::for_tests())
}

pub fn spawn_app_with(config: Config) -> TestApp {
    spawn_app_with_store(config, Arc::new(MemoryStore::new()))
}

pub fn spawn_app_with_store(config: Config, store: Arc<dyn KeyValueStore>) -> TestApp {
    let accounts = Arc::new(InMemoryAccountRepository::new());
    let referrals = Arc::new(InMemoryReferralRepository::new(accounts.clone()));

    let state = AppState::assemble(config, store.clone(), accounts.clone(), referrals);
    TestApp {
        router: routes::create_router(state),
        accounts,
        store,
    }
}

/// Store whose every operation fails, for exercising degraded paths
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Backend {
            message: "store unreachable".to_string(),
        })
    }
    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Duration,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend {
            message: "store unreachable".to_string(),
        })
    }
    async fn increment(&self, _key: &str) -> Result<i64, StoreError> {
        Err(StoreError::Backend {
            message: "store unreachable".to_string(),
        })
    }
    async fn expire(&self, _key: &str, _ttl: Duration) -> Result<(), StoreError> {
        Err(StoreError::Backend {
            message: "store unreachable".to_string(),
        })
    }
    async fn increment_and_expire(&self, _key: &str, _ttl: Duration) -> Result<i64, StoreError> {
        Err(StoreError::Backend {
            message: "store unreachable".to_string(),
        })
    }
}

impl TestApp {
    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Register an account and return its session token
    pub async fn register(&self, email: &str, username: &str, password: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/register",
                json!({"email": email, "username": username, "password": password}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Look up the referral code generated for a registered account
    pub async fn referral_code_of(&self, identifier: &str) -> String {
        use refgate::domain::auth::repositories::IAccountRepository;

        self.accounts
            .find_by_email_or_username(identifier)
            .await
            .unwrap()
            .expect("account not registered")
            .referral_code
            .expect("account has no referral code")
            .as_str()
            .to_string()
    }
}
