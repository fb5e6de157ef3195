//! SMTP transport for notifications.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use thiserror::Error;

use crate::notifier::{DispatchOutcome, Notification, Notifier};

/// SMTP transport configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender, e.g. `"TrueView Portal <portal@example.com>"`.
    pub from: String,
    /// Connection and send timeout.
    pub timeout: Duration,
}

/// Errors building the SMTP transport.
#[derive(Debug, Error)]
pub enum SmtpError {
    #[error("Invalid SMTP configuration: {0}")]
    Configuration(String),
}

/// Notifier that delivers over SMTP with a bounded timeout.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Build a notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SmtpError::Configuration`] when the relay host or sender
    /// address is invalid.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| SmtpError::Configuration(format!("Invalid from address: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| SmtpError::Configuration(format!("Invalid relay host: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> DispatchOutcome {
        let to: Mailbox = match notification.to.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => return DispatchOutcome::Failed(format!("Invalid recipient: {e}")),
        };

        let message = match Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(notification.subject.clone())
            .body(notification.body.clone())
        {
            Ok(message) => message,
            Err(e) => return DispatchOutcome::Failed(format!("Message build failed: {e}")),
        };

        match self.transport.send(message).await {
            Ok(_) => DispatchOutcome::Sent,
            Err(e) => {
                tracing::warn!(error = %e, to = %notification.to, "SMTP send failed");
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }
}
