//! Authentication domain errors

use thiserror::Error;

/// Authentication-specific domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username: {reason}")]
    InvalidUsername { reason: String },

    #[error("Password must be at least 8 characters")]
    WeakPassword,

    #[error("Email or username already in use")]
    IdentityTaken,

    #[error("Invalid credentials provided")]
    InvalidCredentials,

    #[error("Account not found")]
    AccountNotFound,

    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token provided")]
    InvalidToken,

    #[error("Database error: {message}")]
    DatabaseError { message: String },
}
