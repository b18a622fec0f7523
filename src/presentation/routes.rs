//! Route configuration

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router, middleware::from_fn, middleware::from_fn_with_state};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::{Modify, OpenApi};

use crate::app::AppState;
use crate::presentation::{auth, middleware, referral};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "refgate",
        description = "Account registration, login, and referral tracking API"
    ),
    paths(
        auth::controller::register,
        auth::controller::login,
        auth::controller::forgot_password,
        referral::controller::list_referrals,
        referral::controller::referral_stats,
    ),
    components(schemas(
        auth::models::RegisterRequest,
        auth::models::LoginRequest,
        auth::models::ForgotPasswordRequest,
        auth::models::TokenResponse,
        crate::presentation::models::MessageResponse,
        crate::presentation::models::ErrorBody,
        crate::domain::referral::entities::ReferralRecord,
        crate::domain::referral::entities::ReferralStatus,
        crate::application::referral::ReferralStats,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and authentication"),
        (name = "referral", description = "Referral tracking")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let mut api = Router::new()
        .route("/register", post(auth::controller::register))
        .route("/login", post(auth::controller::login))
        .route("/forgot-password", post(auth::controller::forgot_password))
        .route("/referrals", get(referral::controller::list_referrals))
        .route("/referral-stats", get(referral::controller::referral_stats));

    // The gate wraps the API surface only; the OpenAPI document stays
    // reachable even when a client is limited.
    if state.config.rate_limit.enabled {
        api = api.layer(from_fn_with_state(state.clone(), middleware::rate_limit));
    }

    let mut router = Router::new().nest("/api", api);

    if state.config.server.enable_docs {
        router = router.route("/api-docs/openapi.json", get(openapi_spec));
    }

    router
        .layer(from_fn(middleware::request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.server.request_timeout_seconds,
        )))
        .layer(cors_layer(&state.config.server.cors_allowed_origins))
        .with_state(state)
}
