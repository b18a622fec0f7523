//! Referral HTTP handlers

use axum::Json;
use axum::extract::State;

use crate::app::AppState;
use crate::application::referral::ReferralStats;
use crate::domain::referral::entities::ReferralRecord;
use crate::presentation::auth::extractors::AuthAccount;
use crate::presentation::models::{ApiError, ErrorBody};

/// List the caller's referrals
#[utoipa::path(
    get,
    path = "/api/referrals",
    responses(
        (status = 200, description = "Referrals recorded for this account", body = [ReferralRecord]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "referral"
)]
pub async fn list_referrals(
    State(state): State<AppState>,
    AuthAccount(account_id): AuthAccount,
) -> Result<Json<Vec<ReferralRecord>>, ApiError> {
    let referrals = state.referral_queries.list_referrals(&account_id).await?;
    Ok(Json(referrals))
}

/// Aggregate referral statistics for the caller
#[utoipa::path(
    get,
    path = "/api/referral-stats",
    responses(
        (status = 200, description = "Referral statistics", body = ReferralStats),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "referral"
)]
pub async fn referral_stats(
    State(state): State<AppState>,
    AuthAccount(account_id): AuthAccount,
) -> Result<Json<ReferralStats>, ApiError> {
    let stats = state.referral_queries.referral_stats(&account_id).await?;
    Ok(Json(stats))
}
