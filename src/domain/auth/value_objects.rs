//! Authentication value objects

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account ID value object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Create a new AccountId from UUID
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random AccountId
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Get as string
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl From<Uuid> for AccountId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<AccountId> for Uuid {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email value object with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Create a new Email with validation
    pub fn new(email: String) -> Result<Self, String> {
        let email = email.trim().to_lowercase();

        if email.is_empty() {
            return Err("Email cannot be empty".to_string());
        }

        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 {
            return Err("Invalid email format".to_string());
        }

        let (local, domain) = (parts[0], parts[1]);
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err("Invalid email format".to_string());
        }

        if email.len() > 255 {
            return Err("Email too long (max 255 characters)".to_string());
        }

        Ok(Email(email))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get as owned string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for Email {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Username value object
///
/// Usernames are 3-32 characters, ASCII alphanumeric plus `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub const MIN_LENGTH: usize = 3;
    pub const MAX_LENGTH: usize = 32;

    /// Create a new Username with validation
    pub fn new(username: String) -> Result<Self, String> {
        let username = username.trim().to_string();

        if username.len() < Self::MIN_LENGTH || username.len() > Self::MAX_LENGTH {
            return Err(format!(
                "Username must be between {} and {} characters",
                Self::MIN_LENGTH,
                Self::MAX_LENGTH
            ));
        }

        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err("Username may only contain letters, digits, '_' and '-'".to_string());
        }

        Ok(Username(username))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Password value object
///
/// The only local requirement is a minimum length; strength estimation is
/// out of scope.
#[derive(Debug, Clone)]
pub struct Password(String);

impl Password {
    /// Minimum password length
    pub const MIN_LENGTH: usize = 8;

    /// Create a new Password with validation
    pub fn new(password: String) -> Result<Self, String> {
        if password.len() < Self::MIN_LENGTH {
            return Err(format!(
                "Password must be at least {} characters",
                Self::MIN_LENGTH
            ));
        }
        Ok(Password(password))
    }

    /// Get the inner password string (for hashing)
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Password hash value object (never exposes raw hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Create a new PasswordHash
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Get the hash for verification (internal use only)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Intentionally not implementing Display or Serialize to prevent accidental exposure
impl From<String> for PasswordHash {
    fn from(hash: String) -> Self {
        Self(hash)
    }
}

/// Referral code value object
///
/// Codes are opaque, globally unique, case-sensitive strings. Generated codes
/// are 10 alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Generated code length
    pub const LENGTH: usize = 10;

    /// Create a ReferralCode from an existing code string
    pub fn new(code: String) -> Result<Self, String> {
        let code = code.trim().to_string();
        if code.is_empty() {
            return Err("Referral code cannot be empty".to_string());
        }
        Ok(ReferralCode(code))
    }

    /// Generate a new random referral code
    pub fn generate() -> Self {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::LENGTH)
            .map(char::from)
            .collect();
        ReferralCode(code)
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(Email::new("user@example.com".to_string()).is_ok());
        assert!(Email::new("test.user@example.co.uk".to_string()).is_ok());
        assert!(Email::new("  USER@EXAMPLE.COM  ".to_string()).is_ok());

        assert!(Email::new("".to_string()).is_err());
        assert!(Email::new("invalid".to_string()).is_err());
        assert!(Email::new("@example.com".to_string()).is_err());
        assert!(Email::new("user@".to_string()).is_err());
        assert!(Email::new("user@domain".to_string()).is_err());
    }

    #[test]
    fn test_email_normalization() {
        let email = Email::new("  USER@EXAMPLE.COM  ".to_string()).unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn test_username_validation() {
        assert!(Username::new("alice".to_string()).is_ok());
        assert!(Username::new("test_user-1".to_string()).is_ok());

        assert!(Username::new("ab".to_string()).is_err());
        assert!(Username::new("a".repeat(33)).is_err());
        assert!(Username::new("bad name".to_string()).is_err());
        assert!(Username::new("bad@name".to_string()).is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(Password::new("longenough".to_string()).is_ok());
        assert!(Password::new("short".to_string()).is_err());
        assert!(Password::new("1234567".to_string()).is_err());
        assert!(Password::new("12345678".to_string()).is_ok());
    }

    #[test]
    fn test_referral_code_generation() {
        let code = ReferralCode::generate();
        assert_eq!(code.as_str().len(), ReferralCode::LENGTH);
        assert!(code.as_str().chars().all(|c| c.is_ascii_alphanumeric()));

        // Two generated codes should differ
        assert_ne!(ReferralCode::generate(), ReferralCode::generate());
    }

    #[test]
    fn test_referral_code_rejects_empty() {
        assert!(ReferralCode::new("  ".to_string()).is_err());
        assert!(ReferralCode::new("AC1".to_string()).is_ok());
    }

    #[test]
    fn test_account_id_roundtrip() {
        let uuid = Uuid::new_v4();
        let id = AccountId::new(uuid);
        assert_eq!(id.as_uuid(), uuid);
        assert_eq!(AccountId::from(uuid), id);
    }
}
