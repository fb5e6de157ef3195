//! PostgreSQL implementation of the portal store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use trueview_core::{ClientId, ClientStatus, DeliverableId, ProjectId};

use crate::error::StoreError;
use crate::models::{
    AccessPolicy, Client, Deliverable, NewAccessLog, NewClient, NewDeliverable, NewProject,
    NewTimelineEvent, Project, TimelineEvent,
};
use crate::store::PortalStore;

/// Portal store backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool (health checks).
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Lowercase an email for the uniqueness key.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl PortalStore for PgStore {
    async fn create_client_with_project(
        &self,
        client: NewClient,
        project: NewProject,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // The UNIQUE constraint arbitrates concurrent inserts: the loser of
        // the race sees zero rows affected and the transaction is dropped.
        let inserted = sqlx::query(
            r"
            INSERT INTO clients (id, email, display_name, company_name, phone,
                                 password_hash, role, status, deliverables_access, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now())
            ON CONFLICT (email) DO NOTHING
            ",
        )
        .bind(client.id.as_uuid())
        .bind(normalize_email(&client.email))
        .bind(&client.display_name)
        .bind(&client.company_name)
        .bind(&client.phone)
        .bind(&client.password_hash)
        .bind(client.role.as_str())
        .bind(client.status.as_str())
        .bind(serde_json::to_value(&client.deliverables_access).unwrap_or_default())
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            return Err(StoreError::DuplicateEmail);
        }

        sqlx::query(
            r"
            INSERT INTO projects (id, client_id, name, service_type, package,
                                  scheduled_date, total_amount, details, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now())
            ",
        )
        .bind(project.id.as_uuid())
        .bind(project.client_id.as_uuid())
        .bind(&project.name)
        .bind(&project.service_type)
        .bind(&project.package)
        .bind(&project.scheduled_date)
        .bind(project.total_amount)
        .bind(&project.details)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_client_by_email(&self, email: &str) -> Result<Option<Client>, StoreError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    async fn get_client(&self, id: ClientId) -> Result<Option<Client>, StoreError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        let clients =
            sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(clients)
    }

    async fn record_login(&self, id: ClientId, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query("UPDATE clients SET last_login_at = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_access_policy(
        &self,
        id: ClientId,
        policy: &AccessPolicy,
    ) -> Result<(), StoreError> {
        let updated = sqlx::query("UPDATE clients SET deliverables_access = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(serde_json::to_value(policy).unwrap_or_default())
            .execute(&self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn set_client_status(
        &self,
        id: ClientId,
        status: ClientStatus,
    ) -> Result<(), StoreError> {
        let updated = sqlx::query("UPDATE clients SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get_project_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE client_id = $1 ORDER BY created_at LIMIT 1",
        )
        .bind(client_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn merge_project_details(
        &self,
        client_id: ClientId,
        details: &Value,
    ) -> Result<(), StoreError> {
        let updated = sqlx::query(
            "UPDATE projects SET details = $2, updated_at = now() WHERE client_id = $1",
        )
        .bind(client_id.as_uuid())
        .bind(details)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get_deliverable(
        &self,
        id: DeliverableId,
    ) -> Result<Option<Deliverable>, StoreError> {
        let deliverable =
            sqlx::query_as::<_, Deliverable>("SELECT * FROM deliverables WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;
        Ok(deliverable)
    }

    async fn list_deliverables(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Deliverable>, StoreError> {
        let deliverables = sqlx::query_as::<_, Deliverable>(
            "SELECT * FROM deliverables WHERE project_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(project_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        Ok(deliverables)
    }

    async fn insert_deliverable(&self, deliverable: NewDeliverable) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO deliverables (id, project_id, kind, category, storage_ref,
                                      filename, file_size, mime_type, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
            ",
        )
        .bind(deliverable.id.as_uuid())
        .bind(deliverable.project_id.as_uuid())
        .bind(deliverable.kind.as_str())
        .bind(&deliverable.category)
        .bind(&deliverable.storage_ref)
        .bind(&deliverable.filename)
        .bind(deliverable.file_size)
        .bind(&deliverable.mime_type)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn increment_download_count(&self, id: DeliverableId) -> Result<(), StoreError> {
        let updated = sqlx::query(
            "UPDATE deliverables SET download_count = download_count + 1 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn append_access_log(&self, entry: NewAccessLog) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO access_logs (id, client_id, project_id, deliverable_id,
                                     access_kind, ip_address, user_agent, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now())
            ",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(entry.client_id.as_uuid())
        .bind(entry.project_id.as_uuid())
        .bind(entry.deliverable_id.as_uuid())
        .bind(&entry.access_kind)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_timeline(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<TimelineEvent>, StoreError> {
        let events = sqlx::query_as::<_, TimelineEvent>(
            "SELECT * FROM timeline_events WHERE project_id = $1 ORDER BY occurred_at DESC",
        )
        .bind(project_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    async fn append_timeline_event(&self, event: NewTimelineEvent) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO timeline_events (id, project_id, event_type, title, description, occurred_at)
            VALUES ($1, $2, $3, $4, $5, now())
            ",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(event.project_id.as_uuid())
        .bind(&event.event_type)
        .bind(&event.title)
        .bind(&event.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_email("  A.Client@Example.COM "), "a.client@example.com");
    }
}
