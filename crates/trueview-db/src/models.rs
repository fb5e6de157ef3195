//! Record models owned by the portal store.
//!
//! Rows keep plain column types (uuid, text, jsonb) and expose typed
//! accessors for the strongly typed ids and closed enums, so a corrupt
//! stored tag surfaces as an explicit error instead of a panic.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use std::collections::BTreeMap;
use trueview_core::{ClientId, ClientStatus, DeliverableId, DeliverableKind, ProjectId, Role};

use crate::error::StoreError;

/// Per-category deliverable access flags (`category → allowed`).
pub type AccessPolicy = BTreeMap<String, bool>;

/// Default policy granted at provisioning: every category enabled.
#[must_use]
pub fn default_access_policy() -> AccessPolicy {
    ["images", "maps", "models", "videos", "reports"]
        .into_iter()
        .map(|category| (category.to_string(), true))
        .collect()
}

/// A client account.
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    /// Unique identifier.
    pub id: uuid::Uuid,

    /// Email, stored lowercase; unique across all clients.
    pub email: String,

    /// Contact display name.
    pub display_name: String,

    /// Company name, when the booking carried one.
    pub company_name: Option<String>,

    /// Contact phone number.
    pub phone: Option<String>,

    /// Argon2id password hash. Plaintext is never stored.
    pub password_hash: String,

    /// Role tag: `client` or `admin`.
    pub role: String,

    /// Status tag: `pending`, `active`, or `suspended`.
    pub status: String,

    /// Per-category deliverable access flags (jsonb).
    pub deliverables_access: Value,

    /// When the account was provisioned.
    pub created_at: DateTime<Utc>,

    /// Most recent successful login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Client {
    /// Typed client identifier.
    #[must_use]
    pub fn client_id(&self) -> ClientId {
        ClientId::from_uuid(self.id)
    }

    /// Parse the stored role tag.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] for an unknown tag.
    pub fn role(&self) -> Result<Role, StoreError> {
        self.role
            .parse()
            .map_err(|e: trueview_core::types::UnknownVariant| StoreError::Corrupt(e.to_string()))
    }

    /// Parse the stored status tag.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] for an unknown tag.
    pub fn status(&self) -> Result<ClientStatus, StoreError> {
        self.status
            .parse()
            .map_err(|e: trueview_core::types::UnknownVariant| StoreError::Corrupt(e.to_string()))
    }

    /// Decode the per-category access policy.
    ///
    /// Unknown shapes decode to an empty policy (deny-all) rather than
    /// failing the whole request.
    #[must_use]
    pub fn access_policy(&self) -> AccessPolicy {
        serde_json::from_value(self.deliverables_access.clone()).unwrap_or_default()
    }

    /// Whether the given deliverable category is enabled for this client.
    #[must_use]
    pub fn category_allowed(&self, category: &str) -> bool {
        self.access_policy().get(category).copied().unwrap_or(false)
    }
}

/// Input record for creating a client.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub id: ClientId,
    /// Will be normalized to lowercase by the store.
    pub email: String,
    pub display_name: String,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub status: ClientStatus,
    pub deliverables_access: AccessPolicy,
}

/// A client project.
#[derive(Debug, Clone, FromRow)]
pub struct Project {
    /// Unique identifier, generated at provisioning.
    pub id: uuid::Uuid,

    /// Owning client.
    pub client_id: uuid::Uuid,

    /// Project name from the booking.
    pub name: String,

    /// Service metadata the core passes through without interpreting.
    pub service_type: Option<String>,
    pub package: Option<String>,
    pub scheduled_date: Option<String>,
    pub total_amount: Option<f64>,

    /// Raw booking metadata (jsonb), replaced wholesale on update events.
    pub details: Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Typed project identifier.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        ProjectId::from_uuid(self.id)
    }

    /// Typed owning client identifier.
    #[must_use]
    pub fn owner_id(&self) -> ClientId {
        ClientId::from_uuid(self.client_id)
    }
}

/// Input record for creating a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub id: ProjectId,
    pub client_id: ClientId,
    pub name: String,
    pub service_type: Option<String>,
    pub package: Option<String>,
    pub scheduled_date: Option<String>,
    pub total_amount: Option<f64>,
    pub details: Value,
}

/// A delivered file. Created by the upload pipeline; the core only reads
/// rows and increments the download counter.
#[derive(Debug, Clone, FromRow)]
pub struct Deliverable {
    pub id: uuid::Uuid,
    pub project_id: uuid::Uuid,

    /// Kind tag: `image`, `map`, `model`, `video`, or `report`.
    pub kind: String,

    /// Free-form grouping used by the access policy (`images`, `maps`, ...).
    pub category: String,

    /// Opaque handle into media storage.
    pub storage_ref: String,

    pub filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,

    /// Monotonic counter, incremented only by the access controller.
    pub download_count: i64,
}

impl Deliverable {
    /// Typed deliverable identifier.
    #[must_use]
    pub fn deliverable_id(&self) -> DeliverableId {
        DeliverableId::from_uuid(self.id)
    }

    /// Typed owning project identifier.
    #[must_use]
    pub fn owner_project_id(&self) -> ProjectId {
        ProjectId::from_uuid(self.project_id)
    }

    /// Parse the stored kind tag.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] for an unknown tag.
    pub fn kind(&self) -> Result<DeliverableKind, StoreError> {
        self.kind
            .parse()
            .map_err(|e: trueview_core::types::UnknownVariant| StoreError::Corrupt(e.to_string()))
    }
}

/// Input record for registering a deliverable.
#[derive(Debug, Clone)]
pub struct NewDeliverable {
    pub id: DeliverableId,
    pub project_id: ProjectId,
    pub kind: DeliverableKind,
    pub category: String,
    pub storage_ref: String,
    pub filename: String,
    pub file_size: i64,
    pub mime_type: String,
}

/// A project timeline entry (append-only).
#[derive(Debug, Clone, FromRow)]
pub struct TimelineEvent {
    pub id: uuid::Uuid,
    pub project_id: uuid::Uuid,
    pub event_type: String,
    pub title: String,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Input record for a timeline entry.
#[derive(Debug, Clone)]
pub struct NewTimelineEvent {
    pub project_id: ProjectId,
    pub event_type: String,
    pub title: String,
    pub description: Option<String>,
}

/// An access-log entry (append-only, write-once).
#[derive(Debug, Clone, FromRow)]
pub struct AccessLogEntry {
    pub id: uuid::Uuid,
    pub client_id: uuid::Uuid,
    pub project_id: uuid::Uuid,
    pub deliverable_id: uuid::Uuid,
    pub access_kind: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Input record for an access-log entry.
#[derive(Debug, Clone)]
pub struct NewAccessLog {
    pub client_id: ClientId,
    pub project_id: ProjectId,
    pub deliverable_id: DeliverableId,
    pub access_kind: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
