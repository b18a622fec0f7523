//! Authentication HTTP handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::app::AppState;
use crate::application::auth::RegisterInput;
use crate::presentation::auth::models::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, TokenResponse,
};
use crate::presentation::models::{ApiError, ErrorBody, MessageResponse};

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Validation or referral failure", body = ErrorBody),
        (status = 429, description = "Rate limited", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let token = state
        .register_use_case
        .execute(RegisterInput {
            email: request.email,
            username: request.username,
            password: request.password,
            referral_code: request.referral_code,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Authenticate with email or username
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 429, description = "Rate limited", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .login_use_case
        .execute(&request.email_or_username, &request.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// Request a password reset email
#[utoipa::path(
    post,
    path = "/api/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent", body = MessageResponse),
        (status = 404, description = "Unknown email", body = ErrorBody),
        (status = 429, description = "Rate limited", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.password_reset_use_case.execute(&request.email).await?;

    Ok(Json(MessageResponse {
        message: "Password reset email sent".to_string(),
    }))
}
