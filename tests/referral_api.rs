//! Referral attribution and read endpoint tests

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use common::spawn_app;
use refgate::domain::auth::entities::Account;
use refgate::domain::auth::repositories::IAccountRepository;
use refgate::domain::auth::value_objects::{
    AccountId, Email, PasswordHash, ReferralCode, Username,
};
use refgate::infrastructure::auth::{JwtService, TokenClass};
use refgate::infrastructure::store::KeyValueStore;

#[tokio::test]
async fn referral_flow_records_edge_and_stats() {
    let app = spawn_app();
    let alice_token = app
        .register("alice@example.com", "alice", "password123")
        .await;
    let code = app.referral_code_of("alice").await;

    let (status, _) = app
        .post_json(
            "/api/register",
            json!({
                "email": "bob@example.com",
                "username": "bob",
                "password": "password123",
                "referralCode": code
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, stats) = app.get("/api/referral-stats", Some(&alice_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats, json!({"successfulReferrals": 1}));

    let (status, referrals) = app.get("/api/referrals", Some(&alice_token)).await;
    assert_eq!(status, StatusCode::OK);
    let referrals = referrals.as_array().unwrap();
    assert_eq!(referrals.len(), 1);
    assert_eq!(referrals[0]["username"], "bob");
    assert_eq!(referrals[0]["email"], "bob@example.com");
    assert_eq!(referrals[0]["status"], "successful");
}

#[tokio::test]
async fn unknown_referral_code_rejected_but_account_persists() {
    let app = spawn_app();

    let (status, body) = app
        .post_json(
            "/api/register",
            json!({
                "email": "bob@example.com",
                "username": "bob",
                "password": "password123",
                "referralCode": "DOESNOTEXIST"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid referral code");

    // The account was created before attribution ran, so login works
    let (status, _) = app
        .post_json(
            "/api/login",
            json!({"emailOrUsername": "bob", "password": "password123"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn expired_referral_code_rejected() {
    let app = spawn_app();

    // Seed a referrer whose code expired an hour ago
    let alice = Account::new(
        AccountId::generate(),
        Email::new("alice@example.com".to_string()).unwrap(),
        Username::new("alice".to_string()).unwrap(),
        PasswordHash::new("hash".to_string()),
        ReferralCode::new("STALECODE1".to_string()).unwrap(),
        Utc::now() - Duration::hours(1),
    );
    app.accounts.create(&alice).await.unwrap();

    let (status, body) = app
        .post_json(
            "/api/register",
            json!({
                "email": "bob@example.com",
                "username": "bob",
                "password": "password123",
                "referralCode": "STALECODE1"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Referral code has expired");
}

#[tokio::test]
async fn duplicate_identity_rejected_before_attribution() {
    let app = spawn_app();
    app.register("alice@example.com", "alice", "password123")
        .await;
    let code = app.referral_code_of("alice").await;

    let (status, body) = app
        .post_json(
            "/api/register",
            json!({
                "email": "alice@example.com",
                "username": "alice",
                "password": "password123",
                "referralCode": code
            }),
        )
        .await;

    // Identity uniqueness wins before the referral code is even looked at
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email or username already in use");

    let (_, login) = app
        .post_json(
            "/api/login",
            json!({"emailOrUsername": "alice", "password": "password123"}),
        )
        .await;
    let token = login["token"].as_str().unwrap();

    let (_, stats) = app.get("/api/referral-stats", Some(token)).await;
    assert_eq!(stats["successfulReferrals"], 0);
}

#[tokio::test]
async fn referral_stats_are_cached_between_reads() {
    let app = spawn_app();
    let alice_token = app
        .register("alice@example.com", "alice", "password123")
        .await;
    let code = app.referral_code_of("alice").await;

    app.post_json(
        "/api/register",
        json!({
            "email": "bob@example.com",
            "username": "bob",
            "password": "password123",
            "referralCode": code
        }),
    )
    .await;

    let (_, stats) = app.get("/api/referral-stats", Some(&alice_token)).await;
    assert_eq!(stats["successfulReferrals"], 1);

    // The first read populated the store
    let alice = app
        .accounts
        .find_by_email_or_username("alice")
        .await
        .unwrap()
        .unwrap();
    let cached = app
        .store
        .get(&format!("referral-stats:{}", alice.account_id))
        .await
        .unwrap();
    assert!(cached.is_some());

    // A referral recorded after the first read is invisible until the cache
    // entry expires
    app.post_json(
        "/api/register",
        json!({
            "email": "carol@example.com",
            "username": "carol",
            "password": "password123",
            "referralCode": code
        }),
    )
    .await;

    let (_, stats) = app.get("/api/referral-stats", Some(&alice_token)).await;
    assert_eq!(stats["successfulReferrals"], 1);
}

#[tokio::test]
async fn reset_token_cannot_access_referrals() {
    let app = spawn_app();
    app.register("alice@example.com", "alice", "password123")
        .await;
    let alice = app
        .accounts
        .find_by_email_or_username("alice")
        .await
        .unwrap()
        .unwrap();

    // Forge a reset token with the same secret the app signs with
    let jwt = JwtService::new(
        "test-secret-key-at-least-32-characters-long".to_string(),
        3600,
        900,
    );
    let reset_token = jwt.issue(alice.account_id, TokenClass::Reset).unwrap();

    let (status, body) = app.get("/api/referrals", Some(&reset_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}
