//! HTTP middleware

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::time::Instant;
use uuid::Uuid;

use crate::app::AppState;
use crate::infrastructure::rate_limit::RateLimitDecision;
use crate::presentation::models::ApiError;

/// Identify the request origin for rate limiting.
///
/// Proxy headers first, then a fixed fallback so unidentified clients share
/// one bucket rather than bypassing the limiter.
fn client_identifier(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|ip| ip.trim().to_string())
        })
        .unwrap_or_else(|| "unknown-ip".to_string())
}

/// Rate limiting gate applied in front of every API route.
///
/// A store failure fails closed: when admission cannot be decided the
/// request is rejected as a server error, not waved through.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let identifier = client_identifier(request.headers());

    match state.rate_limiter.check(&identifier).await {
        Ok(RateLimitDecision::Admitted { .. }) => next.run(request).await,
        Ok(RateLimitDecision::Limited) => ApiError::too_many_requests().into_response(),
        Err(e) => {
            tracing::error!(%identifier, "Rate limit check failed: {}", e);
            ApiError::server_error().into_response()
        }
    }
}

/// Per-request logging with a correlation id and latency
pub async fn request_logging(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %request_id,
        %method,
        path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    response
}
