//! Registration, login, and password reset endpoint tests

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn register_returns_created_with_token() {
    let app = spawn_app();

    let (status, body) = app
        .post_json(
            "/api/register",
            json!({
                "email": "alice@example.com",
                "username": "alice",
                "password": "password123"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let app = spawn_app();

    let (status, body) = app
        .post_json(
            "/api/register",
            json!({"email": "", "username": "alice", "password": "password123"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let app = spawn_app();

    let (status, body) = app
        .post_json(
            "/api/register",
            json!({"email": "not-an-email", "username": "alice", "password": "password123"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email format");
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = spawn_app();

    let (status, body) = app
        .post_json(
            "/api/register",
            json!({"email": "alice@example.com", "username": "alice", "password": "short"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password must be at least 8 characters");
}

#[tokio::test]
async fn register_rejects_taken_identity() {
    let app = spawn_app();
    app.register("alice@example.com", "alice", "password123")
        .await;

    let (status, body) = app
        .post_json(
            "/api/register",
            json!({"email": "alice@example.com", "username": "alice2", "password": "password123"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email or username already in use");

    let (status, body) = app
        .post_json(
            "/api/register",
            json!({"email": "other@example.com", "username": "alice", "password": "password123"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email or username already in use");
}

#[tokio::test]
async fn login_accepts_email_or_username() {
    let app = spawn_app();
    app.register("alice@example.com", "alice", "password123")
        .await;

    let (status, body) = app
        .post_json(
            "/api/login",
            json!({"emailOrUsername": "alice@example.com", "password": "password123"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());

    let (status, _) = app
        .post_json(
            "/api/login",
            json!({"emailOrUsername": "alice", "password": "password123"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = spawn_app();
    app.register("alice@example.com", "alice", "password123")
        .await;

    let (wrong_password_status, wrong_password_body) = app
        .post_json(
            "/api/login",
            json!({"emailOrUsername": "alice", "password": "wrongpassword"}),
        )
        .await;
    let (unknown_user_status, unknown_user_body) = app
        .post_json(
            "/api/login",
            json!({"emailOrUsername": "nobody", "password": "password123"}),
        )
        .await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password_body, unknown_user_body);
    assert_eq!(wrong_password_body["error"], "Invalid credentials");
}

#[tokio::test]
async fn forgot_password_unknown_email_is_not_found() {
    let app = spawn_app();

    let (status, body) = app
        .post_json(
            "/api/forgot-password",
            json!({"email": "nobody@example.com"}),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn forgot_password_malformed_email_is_not_found() {
    let app = spawn_app();

    // A malformed address cannot belong to any account; same answer as an
    // unknown one
    let (status, body) = app
        .post_json("/api/forgot-password", json!({"email": "not-an-email"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn forgot_password_known_email_sends_reset() {
    let app = spawn_app();
    app.register("alice@example.com", "alice", "password123")
        .await;

    let (status, body) = app
        .post_json(
            "/api/forgot-password",
            json!({"email": "alice@example.com"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset email sent");
}

#[tokio::test]
async fn protected_route_distinguishes_missing_and_invalid_token() {
    let app = spawn_app();

    let (status, body) = app.get("/api/referrals", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");

    let (status, body) = app.get("/api/referrals", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn session_token_grants_access_to_protected_routes() {
    let app = spawn_app();
    let token = app
        .register("alice@example.com", "alice", "password123")
        .await;

    let (status, body) = app.get("/api/referrals", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}
