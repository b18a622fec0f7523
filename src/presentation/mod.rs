//! Presentation layer: HTTP routes, handlers, and middleware

pub mod auth;
pub mod middleware;
pub mod models;
pub mod referral;
pub mod routes;

pub use models::{ApiError, ErrorBody, MessageResponse};
