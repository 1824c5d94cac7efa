//! Notification Module
//!
//! Email delivery for signature confirmations and donation receipts.
//! Delivery failures are never fatal to the request that triggered them.

mod smtp;
pub mod templates;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

pub use smtp::SmtpNotifier;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Sending is not configured
    #[error("Email delivery is disabled")]
    Disabled,

    /// Invalid email address
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Failed to build email message
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Send attempt exceeded its time budget
    #[error("Send timed out after {0}s")]
    Timeout(u64),
}

// == Notifier ==
/// Sends one HTML email.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Whether sends can succeed at all. Disabled notifiers skip queueing.
    fn is_enabled(&self) -> bool;

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), NotifyError>;
}

/// Used when no SMTP credentials are configured.
#[derive(Debug, Default, Clone)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<(), NotifyError> {
        info!("Email skipped (not configured): {} -> {}", subject, to);
        Err(NotifyError::Disabled)
    }
}
