//! The `PortalStore` trait: the narrow interface the core sees.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use trueview_core::{ClientId, ClientStatus, DeliverableId, ProjectId};

use crate::error::StoreError;
use crate::models::{
    AccessPolicy, Client, Deliverable, NewAccessLog, NewClient, NewDeliverable, NewProject,
    NewTimelineEvent, Project, TimelineEvent,
};

/// Persistence capability consumed by the provisioning orchestrator, the
/// session service, and the deliverable access controller.
///
/// Implementations must make `create_client_with_project` atomic with
/// respect to email uniqueness: two concurrent calls for the same email
/// must yield exactly one created pair and one [`StoreError::DuplicateEmail`].
#[async_trait]
pub trait PortalStore: Send + Sync {
    /// Atomically create a client and their project.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateEmail`] when a client with the (normalized)
    /// email already exists; callers treat this as "already provisioned".
    async fn create_client_with_project(
        &self,
        client: NewClient,
        project: NewProject,
    ) -> Result<(), StoreError>;

    /// Look up a client by email (case-insensitive).
    async fn find_client_by_email(&self, email: &str) -> Result<Option<Client>, StoreError>;

    /// Look up a client by id.
    async fn get_client(&self, id: ClientId) -> Result<Option<Client>, StoreError>;

    /// All clients, newest first (operator roster).
    async fn list_clients(&self) -> Result<Vec<Client>, StoreError>;

    /// Record a successful login.
    async fn record_login(&self, id: ClientId, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Replace a client's per-category access policy.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the client does not exist.
    async fn update_access_policy(
        &self,
        id: ClientId,
        policy: &AccessPolicy,
    ) -> Result<(), StoreError>;

    /// Set a client's lifecycle status (admin action, out of the webhook path).
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the client does not exist.
    async fn set_client_status(&self, id: ClientId, status: ClientStatus)
        -> Result<(), StoreError>;

    /// The project owned by a client, if any.
    async fn get_project_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Option<Project>, StoreError>;

    /// Look up a project by id.
    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>, StoreError>;

    /// Replace the opaque booking metadata on a client's project.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the client has no project.
    async fn merge_project_details(
        &self,
        client_id: ClientId,
        details: &Value,
    ) -> Result<(), StoreError>;

    /// Look up a deliverable by id.
    async fn get_deliverable(&self, id: DeliverableId)
        -> Result<Option<Deliverable>, StoreError>;

    /// Deliverables for a project, newest first.
    async fn list_deliverables(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Deliverable>, StoreError>;

    /// Register a deliverable (called by the upload pipeline, kept here so
    /// tests and tooling can seed data through the same interface).
    async fn insert_deliverable(&self, deliverable: NewDeliverable) -> Result<(), StoreError>;

    /// Increment a deliverable's download counter by exactly one.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the deliverable does not exist.
    async fn increment_download_count(&self, id: DeliverableId) -> Result<(), StoreError>;

    /// Append an access-log entry. Entries are write-once.
    async fn append_access_log(&self, entry: NewAccessLog) -> Result<(), StoreError>;

    /// Timeline entries for a project, newest first.
    async fn list_timeline(&self, project_id: ProjectId)
        -> Result<Vec<TimelineEvent>, StoreError>;

    /// Append a timeline entry.
    async fn append_timeline_event(&self, event: NewTimelineEvent) -> Result<(), StoreError>;
}
