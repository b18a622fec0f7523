//! JWT service for token generation and validation
//!
//! Two disjoint token classes are issued: session tokens (registration and
//! login) and password-reset tokens. They carry different expiries and a
//! `typ` claim, and one class is never accepted where the other is expected.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::{errors::AuthError, value_objects::AccountId};

/// Token class carried in the `typ` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Issued on register/login, hour-scale validity
    Session,
    /// Issued on password-reset request, minute-scale validity
    Reset,
}

impl TokenClass {
    fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Session => "session",
            TokenClass::Reset => "reset",
        }
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject (account id)
    sub: String,
    /// Expiration timestamp (Unix time)
    exp: usize,
    /// Issued at timestamp (Unix time)
    iat: usize,
    /// Token class: "session" or "reset"
    typ: String,
}

/// JWT service for generating and validating tokens
#[derive(Clone)]
pub struct JwtService {
    /// Secret key for signing tokens
    secret: Arc<String>,
    /// Session token TTL in seconds
    session_ttl_seconds: u64,
    /// Reset token TTL in seconds
    reset_ttl_seconds: u64,
}

impl JwtService {
    /// Create a new JWT service
    pub fn new(secret: String, session_ttl_seconds: u64, reset_ttl_seconds: u64) -> Self {
        Self {
            secret: Arc::new(secret),
            session_ttl_seconds,
            reset_ttl_seconds,
        }
    }

    /// Issue a token of the given class for an account
    pub fn issue(&self, account_id: AccountId, class: TokenClass) -> Result<String, AuthError> {
        let ttl = match class {
            TokenClass::Session => self.session_ttl_seconds,
            TokenClass::Reset => self.reset_ttl_seconds,
        };
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl as i64);

        let claims = Claims {
            sub: account_id.as_str(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            typ: class.as_str().to_string(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT token: {}", e);
            AuthError::InvalidToken
        })
    }

    /// Validate a token, requiring a specific class.
    ///
    /// Any failure (malformed, bad signature, expired, wrong class) maps to
    /// [`AuthError::InvalidToken`]; absence of a token is detected earlier,
    /// at the extractor.
    pub fn verify(&self, token: &str, expected: TokenClass) -> Result<AccountId, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let claims = decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {}", e);
                AuthError::InvalidToken
            })?;

        if claims.typ != expected.as_str() {
            tracing::debug!(
                token_class = %claims.typ,
                expected = expected.as_str(),
                "Token class mismatch"
            );
            return Err(AuthError::InvalidToken);
        }

        Uuid::parse_str(&claims.sub)
            .map(AccountId::from)
            .map_err(|_| AuthError::InvalidToken)
    }
}
