//! The notification capability.

use async_trait::async_trait;

/// A message to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Result of a dispatch attempt. Failures carry a reason for the log and
/// are never escalated into request errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    Failed(String),
}

impl DispatchOutcome {
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent)
    }
}

/// Transport capability for templated messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt to deliver one message.
    async fn send(&self, notification: &Notification) -> DispatchOutcome;
}
