//! Refgate - account registration, authentication, and referral tracking
//!
//! The crate follows Domain-Driven Design layering:
//!
//! - [`domain`] — entities, value objects, errors, and repository traits
//! - [`application`] — use cases, referral attribution, and cache-aside reads
//! - [`infrastructure`] — JWT, password hashing, Redis/in-memory key-value
//!   stores, Postgres/in-memory repositories, mail collaborator
//! - [`presentation`] — axum routes, middleware, extractors, DTOs
//!
//! Configuration is loaded from `config/*.toml` files and `REFGATE__`
//! environment variables (double underscore separator).

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use app::{AppState, create_app};
pub use config::Config;
pub use logging::init_tracing;
