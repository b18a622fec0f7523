//! Request extractors

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::app::AppState;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::value_objects::AccountId;
use crate::infrastructure::auth::TokenClass;
use crate::presentation::models::ApiError;

/// Authenticated account extractor.
///
/// Reads the `Authorization` header and verifies a session token. The two
/// failure modes stay distinct: an absent or empty header is "no token", a
/// present but unverifiable one is "invalid token".
pub struct AuthAccount(pub AccountId);

impl FromRequestParts<AppState> for AuthAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken.into());
        }

        let account_id = state.jwt_service.verify(token, TokenClass::Session)?;
        Ok(AuthAccount(account_id))
    }
}
