//! SMTP delivery via lettre.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use super::{Notifier, NotifyError};
use crate::config::EmailConfig;

/// Sends mail through a STARTTLS relay.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    /// Create a notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the relay host cannot be resolved into a transport.
    pub fn new(config: &EmailConfig) -> Result<Self, NotifyError> {
        let credentials = Credentials::new(config.user.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.sender.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())?;

        self.mailer.send(email).await?;
        info!("Email sent to {}: {}", to, subject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_recipient_rejected_before_sending() {
        let config = EmailConfig {
            host: "localhost".into(),
            password: "secret".into(),
            ..EmailConfig::default()
        };
        let notifier = SmtpNotifier::new(&config).unwrap();

        let result = notifier.send("not an address", "Hi", "<p>hi</p>").await;
        assert!(matches!(result, Err(NotifyError::InvalidAddress(_))));
    }
}
