//! Recording notifier for tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::notifier::{DispatchOutcome, Notification, Notifier};

/// Notifier that records every message instead of sending it.
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose every send fails, for exercising best-effort paths.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Messages recorded so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    /// Number of recorded messages.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, notification: &Notification) -> DispatchOutcome {
        if self.fail {
            return DispatchOutcome::Failed("mock transport down".to_string());
        }
        self.sent.lock().push(notification.clone());
        DispatchOutcome::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> Notification {
        Notification {
            to: "a@x.com".to_string(),
            subject: "Hello".to_string(),
            body: "World".to_string(),
        }
    }

    #[tokio::test]
    async fn records_messages() {
        let mock = MockNotifier::new();
        assert!(mock.send(&message()).await.is_sent());
        assert_eq!(mock.sent_count(), 1);
        assert_eq!(mock.sent()[0].subject, "Hello");
    }

    #[tokio::test]
    async fn failing_mock_reports_failure() {
        let mock = MockNotifier::failing();
        let outcome = mock.send(&message()).await;
        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
        assert_eq!(mock.sent_count(), 0);
    }
}
