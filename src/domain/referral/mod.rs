//! Referral domain module

pub mod entities;
pub mod errors;
pub mod repositories;

pub use entities::*;
pub use errors::*;
pub use repositories::*;
