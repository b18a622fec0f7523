//! Application layer: use cases orchestrating the domain

pub mod auth;
pub mod errors;
pub mod referral;

pub use errors::ApplicationError;
