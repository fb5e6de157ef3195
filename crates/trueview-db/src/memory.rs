//! In-memory implementation of the portal store.
//!
//! Used by unit and router-level tests in place of PostgreSQL. A single
//! mutex guards all maps, so the email check-then-insert in
//! `create_client_with_project` is atomic, the same guarantee the UNIQUE
//! constraint gives the real store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use trueview_core::{ClientId, ClientStatus, DeliverableId, ProjectId};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    AccessPolicy, Client, Deliverable, NewAccessLog, NewClient, NewDeliverable, NewProject,
    NewTimelineEvent, Project, TimelineEvent,
};
use crate::postgres::normalize_email;
use crate::store::PortalStore;

#[derive(Default)]
struct Inner {
    clients: HashMap<Uuid, Client>,
    projects: HashMap<Uuid, Project>,
    deliverables: HashMap<Uuid, Deliverable>,
    timeline: Vec<TimelineEvent>,
    access_logs: Vec<crate::models::AccessLogEntry>,
}

/// In-memory portal store for tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of client records (test assertions).
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.inner.lock().clients.len()
    }

    /// Snapshot of the access log (test assertions).
    #[must_use]
    pub fn access_log_snapshot(&self) -> Vec<crate::models::AccessLogEntry> {
        self.inner.lock().access_logs.clone()
    }
}

#[async_trait]
impl PortalStore for MemoryStore {
    async fn create_client_with_project(
        &self,
        client: NewClient,
        project: NewProject,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();

        let email = normalize_email(&client.email);
        if inner.clients.values().any(|c| c.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        inner.clients.insert(
            client.id.into_uuid(),
            Client {
                id: client.id.into_uuid(),
                email,
                display_name: client.display_name,
                company_name: client.company_name,
                phone: client.phone,
                password_hash: client.password_hash,
                role: client.role.as_str().to_string(),
                status: client.status.as_str().to_string(),
                deliverables_access: serde_json::to_value(&client.deliverables_access)
                    .unwrap_or_default(),
                created_at: now,
                last_login_at: None,
            },
        );
        inner.projects.insert(
            project.id.into_uuid(),
            Project {
                id: project.id.into_uuid(),
                client_id: project.client_id.into_uuid(),
                name: project.name,
                service_type: project.service_type,
                package: project.package,
                scheduled_date: project.scheduled_date,
                total_amount: project.total_amount,
                details: project.details,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(())
    }

    async fn find_client_by_email(&self, email: &str) -> Result<Option<Client>, StoreError> {
        let email = normalize_email(email);
        Ok(self
            .inner
            .lock()
            .clients
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn get_client(&self, id: ClientId) -> Result<Option<Client>, StoreError> {
        Ok(self.inner.lock().clients.get(id.as_uuid()).cloned())
    }

    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        let mut clients: Vec<Client> = self.inner.lock().clients.values().cloned().collect();
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(clients)
    }

    async fn record_login(&self, id: ClientId, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(client) = self.inner.lock().clients.get_mut(id.as_uuid()) {
            client.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn update_access_policy(
        &self,
        id: ClientId,
        policy: &AccessPolicy,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let client = inner
            .clients
            .get_mut(id.as_uuid())
            .ok_or(StoreError::NotFound)?;
        client.deliverables_access = serde_json::to_value(policy).unwrap_or_default();
        Ok(())
    }

    async fn set_client_status(
        &self,
        id: ClientId,
        status: ClientStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let client = inner
            .clients
            .get_mut(id.as_uuid())
            .ok_or(StoreError::NotFound)?;
        client.status = status.as_str().to_string();
        Ok(())
    }

    async fn get_project_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Option<Project>, StoreError> {
        Ok(self
            .inner
            .lock()
            .projects
            .values()
            .find(|p| p.client_id == *client_id.as_uuid())
            .cloned())
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self.inner.lock().projects.get(id.as_uuid()).cloned())
    }

    async fn merge_project_details(
        &self,
        client_id: ClientId,
        details: &Value,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let project = inner
            .projects
            .values_mut()
            .find(|p| p.client_id == *client_id.as_uuid())
            .ok_or(StoreError::NotFound)?;
        project.details = details.clone();
        project.updated_at = Utc::now();
        Ok(())
    }

    async fn get_deliverable(
        &self,
        id: DeliverableId,
    ) -> Result<Option<Deliverable>, StoreError> {
        Ok(self.inner.lock().deliverables.get(id.as_uuid()).cloned())
    }

    async fn list_deliverables(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Deliverable>, StoreError> {
        let mut deliverables: Vec<Deliverable> = self
            .inner
            .lock()
            .deliverables
            .values()
            .filter(|d| d.project_id == *project_id.as_uuid())
            .cloned()
            .collect();
        deliverables.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(deliverables)
    }

    async fn insert_deliverable(&self, deliverable: NewDeliverable) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.deliverables.insert(
            deliverable.id.into_uuid(),
            Deliverable {
                id: deliverable.id.into_uuid(),
                project_id: deliverable.project_id.into_uuid(),
                kind: deliverable.kind.as_str().to_string(),
                category: deliverable.category,
                storage_ref: deliverable.storage_ref,
                filename: deliverable.filename,
                file_size: deliverable.file_size,
                mime_type: deliverable.mime_type,
                uploaded_at: Utc::now(),
                download_count: 0,
            },
        );
        Ok(())
    }

    async fn increment_download_count(&self, id: DeliverableId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let deliverable = inner
            .deliverables
            .get_mut(id.as_uuid())
            .ok_or(StoreError::NotFound)?;
        deliverable.download_count += 1;
        Ok(())
    }

    async fn append_access_log(&self, entry: NewAccessLog) -> Result<(), StoreError> {
        self.inner
            .lock()
            .access_logs
            .push(crate::models::AccessLogEntry {
                id: Uuid::new_v4(),
                client_id: entry.client_id.into_uuid(),
                project_id: entry.project_id.into_uuid(),
                deliverable_id: entry.deliverable_id.into_uuid(),
                access_kind: entry.access_kind,
                ip_address: entry.ip_address,
                user_agent: entry.user_agent,
                occurred_at: Utc::now(),
            });
        Ok(())
    }

    async fn list_timeline(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<TimelineEvent>, StoreError> {
        let mut events: Vec<TimelineEvent> = self
            .inner
            .lock()
            .timeline
            .iter()
            .filter(|e| e.project_id == *project_id.as_uuid())
            .cloned()
            .collect();
        events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(events)
    }

    async fn append_timeline_event(&self, event: NewTimelineEvent) -> Result<(), StoreError> {
        self.inner.lock().timeline.push(TimelineEvent {
            id: Uuid::new_v4(),
            project_id: event.project_id.into_uuid(),
            event_type: event.event_type,
            title: event.title,
            description: event.description,
            occurred_at: Utc::now(),
        });
        Ok(())
    }
}
