//! Password hashing service using Argon2id (OWASP-recommended)

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash as Argon2Hash, PasswordHasher as Argon2Hasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::domain::auth::{errors::AuthError, value_objects::PasswordHash};

/// Password hashing service using Argon2id
///
/// Hashing and verification run on the blocking thread pool so concurrent
/// registrations do not starve the async runtime.
#[derive(Clone)]
pub struct PasswordHasher {
    /// Argon2 parameters (memory cost, time cost, parallelism)
    params: Params,
}

impl PasswordHasher {
    /// OWASP minimum recommended memory cost: 19 MiB (19,456 KiB)
    const MEMORY_COST: u32 = 19_456;
    /// OWASP recommended iterations (time cost)
    const TIME_COST: u32 = 2;
    /// OWASP recommended parallelism
    const PARALLELISM: u32 = 1;
    /// Output hash length in bytes
    const OUTPUT_LEN: usize = 32;

    /// Create a new password hasher with OWASP-recommended parameters
    pub fn new() -> Self {
        let params = Params::new(
            Self::MEMORY_COST,
            Self::TIME_COST,
            Self::PARALLELISM,
            Some(Self::OUTPUT_LEN),
        )
        .expect("Invalid Argon2 parameters");

        Self { params }
    }

    /// Create a new password hasher with custom parameters (testing or
    /// constrained environments).
    pub fn with_params(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        let params = Params::new(memory_cost, time_cost, parallelism, Some(Self::OUTPUT_LEN))
            .expect("Invalid Argon2 parameters");

        Self { params }
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash(&self, password: String) -> Result<PasswordHash, AuthError> {
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
        })
        .await
        .map_err(|e| {
            tracing::error!("Password hash task panicked: {}", e);
            AuthError::InvalidCredentials
        })?
        .map(PasswordHash::from)
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AuthError::InvalidCredentials
        })
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify(&self, password: String, hash: PasswordHash) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || {
            let parsed_hash = Argon2Hash::new(hash.as_str()).map_err(|e| {
                tracing::error!("Failed to parse password hash: {}", e);
                AuthError::InvalidCredentials
            })?;

            // Default configuration extracts parameters from the PHC hash
            let argon2 = Argon2::default();
            Ok(argon2
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        })
        .await
        .map_err(|e| {
            tracing::error!("Password verify task panicked: {}", e);
            AuthError::InvalidCredentials
        })?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
