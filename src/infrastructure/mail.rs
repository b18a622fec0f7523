//! Outbound mail delivery
//!
//! The application layer only knows the [`Mailer`] trait; the default
//! implementation logs the reset link instead of delivering it, which is the
//! deployment mode for local development and tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::auth::value_objects::Email;

/// Mail delivery errors
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail delivery failed: {message}")]
    Delivery { message: String },
}

/// Outbound mailer trait
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a password reset message carrying a short-lived reset token
    async fn send_reset(&self, recipient: &Email, reset_token: &str) -> Result<(), MailError>;
}

/// Mailer that emits the reset link to the log instead of delivering mail
pub struct TracingMailer {
    reset_base_url: String,
}

impl TracingMailer {
    pub fn new(reset_base_url: String) -> Self {
        Self { reset_base_url }
    }

    fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/reset-password?token={}",
            self.reset_base_url.trim_end_matches('/'),
            token
        )
    }
}

#[async_trait]
impl Mailer for TracingMailer {
    async fn send_reset(&self, recipient: &Email, reset_token: &str) -> Result<(), MailError> {
        tracing::info!(
            recipient = %recipient,
            link = %self.reset_link(reset_token),
            "Password reset email sent"
        );
        Ok(())
    }
}
