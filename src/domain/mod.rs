//! Domain layer: entities, value objects, errors, and repository traits

pub mod auth;
pub mod referral;
