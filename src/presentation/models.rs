//! Shared presentation models and the API error type

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::auth::errors::AuthError;
use crate::domain::referral::errors::ReferralError;

/// Error response body: every error answers `{"error": "<reason>"}`
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Informational response body
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// API error: a status code and a client-facing reason
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn too_many_requests() -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, "Too many requests")
    }

    pub fn server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingFields => {
                Self::new(StatusCode::BAD_REQUEST, "All fields are required")
            }
            AuthError::InvalidEmail => Self::new(StatusCode::BAD_REQUEST, "Invalid email format"),
            AuthError::InvalidUsername { reason } => Self::new(StatusCode::BAD_REQUEST, reason),
            AuthError::WeakPassword => Self::new(
                StatusCode::BAD_REQUEST,
                "Password must be at least 8 characters",
            ),
            AuthError::IdentityTaken => Self::new(
                StatusCode::BAD_REQUEST,
                "Email or username already in use",
            ),
            AuthError::InvalidCredentials => {
                Self::new(StatusCode::UNAUTHORIZED, "Invalid credentials")
            }
            AuthError::AccountNotFound => Self::new(StatusCode::NOT_FOUND, "User not found"),
            AuthError::MissingToken => Self::new(StatusCode::UNAUTHORIZED, "No token provided"),
            AuthError::InvalidToken => Self::new(StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::DatabaseError { message } => {
                tracing::error!("Database error: {}", message);
                Self::server_error()
            }
        }
    }
}

impl From<ReferralError> for ApiError {
    fn from(e: ReferralError) -> Self {
        match e {
            ReferralError::InvalidCode => {
                Self::new(StatusCode::BAD_REQUEST, "Invalid referral code")
            }
            ReferralError::SelfReferral => Self::new(
                StatusCode::BAD_REQUEST,
                "Cannot use your own referral code",
            ),
            ReferralError::CodeExpired => {
                Self::new(StatusCode::BAD_REQUEST, "Referral code has expired")
            }
            ReferralError::DatabaseError { message } => {
                tracing::error!("Database error: {}", message);
                Self::server_error()
            }
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::Auth(e) => e.into(),
            ApplicationError::Referral(e) => e.into(),
            ApplicationError::Store(e) => {
                tracing::error!("Store error: {}", e);
                Self::server_error()
            }
            ApplicationError::Mail(e) => {
                tracing::error!("Mail error: {}", e);
                Self::server_error()
            }
            ApplicationError::Configuration { message } => {
                tracing::error!("Configuration error: {}", message);
                Self::server_error()
            }
        }
    }
}
