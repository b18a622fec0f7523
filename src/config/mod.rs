//! Application configuration
//!
//! Layered loading: compiled defaults, then optional `config/{default,local}`
//! files, then environment variables with the `REFGATE__` prefix (e.g.
//! `REFGATE__AUTH__JWT_SECRET`).

use serde::Deserialize;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub mail: MailConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,
    /// Serve the OpenAPI document at /api-docs/openapi.json
    pub enable_docs: bool,
    /// Allowed CORS origins; empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_seconds: 30,
            enable_docs: true,
            cors_allowed_origins: Vec::new(),
        }
    }
}

/// Shared key-value store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Redis-compatible URL; absent means the in-process store
    pub url: Option<String>,
    /// Upper bound for any single store command, in seconds
    pub command_timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            command_timeout_seconds: 2,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; absent means in-memory repositories
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

/// Token configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Secret for signing tokens; must be set outside of development
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    pub session_ttl_seconds: u64,
    /// Password reset token lifetime in seconds
    pub reset_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_ttl_seconds: 3600,
            reset_ttl_seconds: 900,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Fixed window length in seconds
    pub window_seconds: u64,
    /// Maximum admitted requests per origin per window
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_seconds: 900,
            max_requests: 100,
        }
    }
}

/// Outbound mail configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Base URL used to build password reset links
    pub reset_base_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            reset_base_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub level: String,
    /// Emit JSON log lines instead of the human-readable format
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Minimum accepted JWT secret length
    const MIN_SECRET_LENGTH: usize = 16;

    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("REFGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "auth.jwt_secret must be at least {} characters",
                Self::MIN_SECRET_LENGTH
            )));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.max_requests must be greater than zero".to_string(),
            ));
        }
        if self.rate_limit.window_seconds == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.window_seconds must be greater than zero".to_string(),
            ));
        }
        if self.auth.session_ttl_seconds == 0 || self.auth.reset_ttl_seconds == 0 {
            return Err(ConfigError::Invalid(
                "token lifetimes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Configuration suitable for tests: permissive defaults plus a fixed
    /// signing secret.
    pub fn for_tests() -> Self {
        Self {
            auth: AuthConfig {
                jwt_secret: "test-secret-key-at-least-32-characters-long".to_string(),
                ..AuthConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sensible() {
        let config = Config::for_tests();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_seconds, 900);
        assert_eq!(config.auth.session_ttl_seconds, 3600);
        assert_eq!(config.auth.reset_ttl_seconds, 900);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = Config::for_tests();
        config.auth.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let mut config = Config::for_tests();
        config.rate_limit.max_requests = 0;
        assert!(config.validate().is_err());
    }
}
