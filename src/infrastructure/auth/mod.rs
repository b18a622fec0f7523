//! Authentication infrastructure: JWT issuance/verification and password
//! hashing.

pub mod jwt_service;
pub mod password_hasher;

pub use jwt_service::{JwtService, TokenClass};
pub use password_hasher::PasswordHasher;
