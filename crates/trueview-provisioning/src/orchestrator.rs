//! The provisioning orchestrator.
//!
//! Consumes verified CRM events and drives the client lifecycle:
//! `unknown → provisioned → active → suspended`. Idempotency rests on the
//! store's atomic email-unique insert: a redelivered or concurrently
//! delivered booking event loses that race cleanly and is acknowledged
//! without side effects.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use trueview_auth::PasswordHasher;
use trueview_core::{ClientId, ClientStatus, ProjectId, Role};
use trueview_db::models::default_access_policy;
use trueview_db::{NewClient, NewProject, NewTimelineEvent, PortalStore, StoreError};
use trueview_notify::{templates, DispatchOutcome, Notification, Notifier};

use crate::credentials::CredentialIssuer;
use crate::error::ProvisionError;
use crate::events::{BookingEvent, EventClass};

/// Whether a freshly provisioned account gets portal access immediately or
/// waits for deposit confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationPolicy {
    /// Activate at creation time (the default).
    #[default]
    Immediate,
    /// Create as `pending`; an explicit admin action activates later.
    OnDeposit,
}

/// Orchestrator configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct ProvisioningConfig {
    pub activation_policy: ActivationPolicy,
    /// Base URL included in client welcome messages.
    pub portal_url: String,
    /// Recipient of operator notifications.
    pub operator_email: String,
    /// Upper bound on each notification dispatch.
    pub notify_timeout: Duration,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            activation_policy: ActivationPolicy::Immediate,
            portal_url: "http://localhost:8080".to_string(),
            operator_email: "ops@localhost".to_string(),
            notify_timeout: Duration::from_secs(10),
        }
    }
}

/// Outcome of handling one event. All variants are acknowledged with
/// success to the CRM; only errors become 500s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// A new client + project pair was created.
    Provisioned {
        client_id: ClientId,
        project_id: ProjectId,
    },
    /// A client already existed for this email; nothing was written.
    AlreadyProvisioned,
    /// Project metadata was merged into an existing record.
    MetadataMerged,
    /// Update event for an email we have never seen (out-of-order delivery).
    DroppedUnknownClient,
    /// Event class the portal does not act on.
    Ignored,
}

/// Consumes verified booking events.
pub struct ProvisioningService {
    store: Arc<dyn PortalStore>,
    notifier: Arc<dyn Notifier>,
    issuer: CredentialIssuer,
    hasher: PasswordHasher,
    config: ProvisioningConfig,
}

impl ProvisioningService {
    #[must_use]
    pub fn new(
        store: Arc<dyn PortalStore>,
        notifier: Arc<dyn Notifier>,
        config: ProvisioningConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            issuer: CredentialIssuer::new(),
            hasher: PasswordHasher::new(),
            config,
        }
    }

    /// Override the password hasher (tests use cheaper parameters).
    #[must_use]
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Handle one verified event.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] only for payload or collaborator
    /// failures; duplicate delivery is a successful outcome.
    pub async fn handle_event(&self, event: BookingEvent) -> Result<ProvisionOutcome, ProvisionError> {
        if event.client.email.trim().is_empty() {
            return Err(ProvisionError::InvalidPayload(
                "Client email is required".to_string(),
            ));
        }

        match event.classify() {
            EventClass::BookingConfirmed => self.provision(event).await,
            EventClass::ProjectUpdated => self.merge_update(event).await,
            EventClass::Unrecognized => {
                tracing::debug!(event_type = %event.event_type, "Unhandled webhook event");
                Ok(ProvisionOutcome::Ignored)
            }
        }
    }

    /// `unknown → provisioned (→ active)` transition.
    async fn provision(&self, event: BookingEvent) -> Result<ProvisionOutcome, ProvisionError> {
        let issued = self.issuer.issue(&event.client.email, Utc::now());
        let password_hash = self.hasher.hash(&issued.temporary_password)?;

        let status = match self.config.activation_policy {
            ActivationPolicy::Immediate => ClientStatus::Active,
            ActivationPolicy::OnDeposit => ClientStatus::Pending,
        };

        let project_name = event
            .project
            .as_ref()
            .and_then(|p| p.name.clone())
            .unwrap_or_else(|| format!("{} project", event.client.name));

        let new_client = NewClient {
            id: issued.client_id,
            email: event.client.email.clone(),
            display_name: event.client.name.clone(),
            company_name: event.client.business_name.clone(),
            phone: event.client.phone.clone(),
            password_hash,
            role: Role::Client,
            status,
            deliverables_access: default_access_policy(),
        };
        let new_project = NewProject {
            id: issued.project_id,
            client_id: issued.client_id,
            name: project_name,
            service_type: event.project.as_ref().and_then(|p| p.service_type.clone()),
            package: event.project.as_ref().and_then(|p| p.package.clone()),
            scheduled_date: event.project.as_ref().and_then(|p| p.scheduled_date.clone()),
            total_amount: event.project.as_ref().and_then(|p| p.total_amount),
            details: event.project_details(),
        };

        match self
            .store
            .create_client_with_project(new_client, new_project)
            .await
        {
            Ok(()) => {}
            Err(StoreError::DuplicateEmail) => {
                // At-least-once delivery: the email already has an account.
                // Acknowledge without a second welcome message.
                tracing::info!(
                    email = %event.client.email,
                    "Duplicate booking event for provisioned client, skipping"
                );
                return Ok(ProvisionOutcome::AlreadyProvisioned);
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            client_id = %issued.client_id,
            project_id = %issued.project_id,
            event_type = %event.event_type,
            "Client provisioned"
        );

        // Everything past the store write is best-effort: the record is
        // durable and must not be rolled back on notification failure.
        if let Err(e) = self
            .store
            .append_timeline_event(NewTimelineEvent {
                project_id: issued.project_id,
                event_type: "account_provisioned".to_string(),
                title: "Portal account created".to_string(),
                description: Some(format!("Triggered by {}", event.event_type)),
            })
            .await
        {
            tracing::warn!(error = %e, "Failed to append provisioning timeline event");
        }

        let welcome = templates::welcome(&templates::WelcomeDetails {
            to: &event.client.email,
            contact_name: &event.client.name,
            username: &event.client.email,
            temporary_password: &issued.temporary_password,
            project_id: &issued.project_id.to_string(),
            portal_url: &self.config.portal_url,
        });
        self.dispatch("welcome", welcome).await;

        let operator = templates::operator_new_client(
            &self.config.operator_email,
            event
                .client
                .business_name
                .as_deref()
                .unwrap_or(&event.client.name),
            &event.client.name,
            &event.client.email,
            &issued.project_id.to_string(),
        );
        self.dispatch("operator", operator).await;

        Ok(ProvisionOutcome::Provisioned {
            client_id: issued.client_id,
            project_id: issued.project_id,
        })
    }

    /// `project.updated`: merge metadata, or drop when the client is unknown.
    async fn merge_update(&self, event: BookingEvent) -> Result<ProvisionOutcome, ProvisionError> {
        let Some(client) = self.store.find_client_by_email(&event.client.email).await? else {
            tracing::info!(
                email = %event.client.email,
                "Update event for unknown client, dropping (out-of-order delivery)"
            );
            return Ok(ProvisionOutcome::DroppedUnknownClient);
        };

        match self
            .store
            .merge_project_details(client.client_id(), &event.project_details())
            .await
        {
            Ok(()) => {
                tracing::info!(client_id = %client.client_id(), "Project metadata merged");
                Ok(ProvisionOutcome::MetadataMerged)
            }
            // Client without a project row: nothing to merge into.
            Err(StoreError::NotFound) => Ok(ProvisionOutcome::DroppedUnknownClient),
            Err(e) => Err(e.into()),
        }
    }

    /// Send one notification under the configured timeout; log, never fail.
    async fn dispatch(&self, label: &str, notification: Notification) {
        let outcome =
            tokio::time::timeout(self.config.notify_timeout, self.notifier.send(&notification))
                .await;
        match outcome {
            Ok(DispatchOutcome::Sent) => {
                tracing::info!(kind = label, to = %notification.to, "Notification sent");
            }
            Ok(DispatchOutcome::Failed(reason)) => {
                tracing::warn!(kind = label, reason = %reason, "Notification failed");
            }
            Err(_) => {
                tracing::warn!(kind = label, "Notification timed out");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trueview_db::MemoryStore;
    use trueview_notify::MockNotifier;

    fn event(event_type: &str, email: &str) -> BookingEvent {
        serde_json::from_value(serde_json::json!({
            "eventType": event_type,
            "client": {"name": "Jordan Example", "email": email,
                       "businessName": "Acme Fields"},
            "project": {"serviceType": "aerial-survey", "name": "North Field",
                        "package": "premium", "totalAmount": 4200.0}
        }))
        .unwrap()
    }

    fn service(
        store: Arc<MemoryStore>,
        notifier: Arc<MockNotifier>,
        policy: ActivationPolicy,
    ) -> ProvisioningService {
        ProvisioningService::new(
            store,
            notifier,
            ProvisioningConfig {
                activation_policy: policy,
                ..ProvisioningConfig::default()
            },
        )
        .with_hasher(PasswordHasher::with_params(4096, 1, 1).unwrap())
    }

    #[tokio::test]
    async fn booking_event_provisions_client_and_project() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let svc = service(store.clone(), notifier.clone(), ActivationPolicy::Immediate);

        let outcome = svc.handle_event(event("project.booked", "a@x.com")).await.unwrap();

        let ProvisionOutcome::Provisioned { client_id, project_id } = outcome else {
            panic!("expected Provisioned, got {outcome:?}");
        };

        let client = store.get_client(client_id).await.unwrap().unwrap();
        assert_eq!(client.email, "a@x.com");
        assert_eq!(client.status, "active");
        assert!(client.category_allowed("images"));

        let project = store.get_project(project_id).await.unwrap().unwrap();
        assert_eq!(project.name, "North Field");
        assert_eq!(project.details["serviceType"], "aerial-survey");

        // Welcome + operator notification.
        assert_eq!(notifier.sent_count(), 2);
        let timeline = store.list_timeline(project_id).await.unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].event_type, "account_provisioned");
    }

    #[tokio::test]
    async fn duplicate_event_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let svc = service(store.clone(), notifier.clone(), ActivationPolicy::Immediate);

        let first = svc.handle_event(event("project.booked", "a@x.com")).await.unwrap();
        let second = svc.handle_event(event("invoice.paid", "a@x.com")).await.unwrap();

        assert!(matches!(first, ProvisionOutcome::Provisioned { .. }));
        assert_eq!(second, ProvisionOutcome::AlreadyProvisioned);
        assert_eq!(store.client_count(), 1);
        // The second delivery must not trigger another welcome message.
        assert_eq!(notifier.sent_count(), 2);
    }

    #[tokio::test]
    async fn deposit_policy_creates_pending_accounts() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let svc = service(store.clone(), notifier, ActivationPolicy::OnDeposit);

        let outcome = svc.handle_event(event("contract.signed", "a@x.com")).await.unwrap();
        let ProvisionOutcome::Provisioned { client_id, .. } = outcome else {
            panic!("expected Provisioned");
        };

        let client = store.get_client(client_id).await.unwrap().unwrap();
        assert_eq!(client.status, "pending");
    }

    #[tokio::test]
    async fn notification_failure_does_not_roll_back() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MockNotifier::failing());
        let svc = service(store.clone(), notifier, ActivationPolicy::Immediate);

        let outcome = svc.handle_event(event("project.booked", "a@x.com")).await.unwrap();

        assert!(matches!(outcome, ProvisionOutcome::Provisioned { .. }));
        assert_eq!(store.client_count(), 1);
    }

    #[tokio::test]
    async fn update_merges_metadata_for_known_client() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let svc = service(store.clone(), notifier, ActivationPolicy::Immediate);

        svc.handle_event(event("project.booked", "a@x.com")).await.unwrap();

        let mut update = event("project.updated", "a@x.com");
        update.project.as_mut().unwrap().package = Some("enterprise".to_string());
        let outcome = svc.handle_event(update).await.unwrap();
        assert_eq!(outcome, ProvisionOutcome::MetadataMerged);

        let client = store.find_client_by_email("a@x.com").await.unwrap().unwrap();
        let project = store
            .get_project_for_client(client.client_id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(project.details["package"], "enterprise");
    }

    #[tokio::test]
    async fn update_for_unknown_client_is_dropped() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let svc = service(store.clone(), notifier.clone(), ActivationPolicy::Immediate);

        let outcome = svc.handle_event(event("project.updated", "never@seen.com")).await.unwrap();

        assert_eq!(outcome, ProvisionOutcome::DroppedUnknownClient);
        assert_eq!(store.client_count(), 0);
        assert_eq!(notifier.sent_count(), 0);
    }

    #[tokio::test]
    async fn unrecognized_event_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let svc = service(store.clone(), notifier.clone(), ActivationPolicy::Immediate);

        let outcome = svc.handle_event(event("client.archived", "a@x.com")).await.unwrap();

        assert_eq!(outcome, ProvisionOutcome::Ignored);
        assert_eq!(store.client_count(), 0);
        assert_eq!(notifier.sent_count(), 0);
    }

    #[tokio::test]
    async fn empty_email_is_an_invalid_payload() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let svc = service(store, notifier, ActivationPolicy::Immediate);

        let err = svc.handle_event(event("project.booked", "  ")).await.unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidPayload(_)));
    }
}
