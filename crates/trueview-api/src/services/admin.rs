//! Operator roster management.

use std::sync::Arc;

use trueview_core::{ClientId, ClientStatus};
use trueview_db::{AccessPolicy, PortalStore};

use crate::error::ApiError;
use crate::models::ClientSummary;

/// Admin-only operations over the client roster. Role checks happen at the
/// handler; this service assumes an already-authorized caller.
pub struct AdminService {
    store: Arc<dyn PortalStore>,
}

impl AdminService {
    #[must_use]
    pub fn new(store: Arc<dyn PortalStore>) -> Self {
        Self { store }
    }

    /// The full client roster, newest first.
    ///
    /// # Errors
    ///
    /// Store failures surface as 500s.
    pub async fn list_clients(&self) -> Result<Vec<ClientSummary>, ApiError> {
        let clients = self.store.list_clients().await?;

        let mut summaries = Vec::with_capacity(clients.len());
        for client in clients {
            let project = self.store.get_project_for_client(client.client_id()).await?;
            summaries.push(ClientSummary {
                client_id: client.id,
                project_id: project.map(|p| p.id),
                company_name: client.company_name.clone(),
                contact_name: client.display_name.clone(),
                email: client.email.clone(),
                phone: client.phone.clone(),
                status: client.status.clone(),
                created_at: client.created_at,
            });
        }
        Ok(summaries)
    }

    /// Replace a client's per-category access policy.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the client does not exist.
    pub async fn update_access_policy(
        &self,
        client_id: ClientId,
        policy: &AccessPolicy,
    ) -> Result<(), ApiError> {
        self.store.update_access_policy(client_id, policy).await?;
        tracing::info!(client_id = %client_id, "Deliverables access policy updated");
        Ok(())
    }

    /// Activate a pending client (deposit-confirmation path).
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the client does not exist.
    pub async fn activate_client(&self, client_id: ClientId) -> Result<(), ApiError> {
        self.store
            .set_client_status(client_id, ClientStatus::Active)
            .await?;
        tracing::info!(client_id = %client_id, "Client activated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trueview_core::{ProjectId, Role};
    use trueview_db::models::default_access_policy;
    use trueview_db::{MemoryStore, NewClient, NewProject};

    async fn seeded() -> (Arc<MemoryStore>, AdminService, ClientId) {
        let store = Arc::new(MemoryStore::new());
        let client_id = ClientId::new();
        store
            .create_client_with_project(
                NewClient {
                    id: client_id,
                    email: "a@x.com".to_string(),
                    display_name: "Jordan".to_string(),
                    company_name: Some("Acme".to_string()),
                    phone: Some("555-0100".to_string()),
                    password_hash: "$argon2id$fake".to_string(),
                    role: Role::Client,
                    status: trueview_core::ClientStatus::Pending,
                    deliverables_access: default_access_policy(),
                },
                NewProject {
                    id: ProjectId::new(),
                    client_id,
                    name: "Survey".to_string(),
                    service_type: None,
                    package: None,
                    scheduled_date: None,
                    total_amount: None,
                    details: serde_json::json!({}),
                },
            )
            .await
            .unwrap();
        let service = AdminService::new(store.clone());
        (store, service, client_id)
    }

    #[tokio::test]
    async fn roster_includes_project_ids() {
        let (_store, service, client_id) = seeded().await;
        let roster = service.list_clients().await.unwrap();

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].client_id, *client_id.as_uuid());
        assert!(roster[0].project_id.is_some());
        assert_eq!(roster[0].status, "pending");
    }

    #[tokio::test]
    async fn activate_flips_pending_to_active() {
        let (store, service, client_id) = seeded().await;
        service.activate_client(client_id).await.unwrap();

        let client = store.get_client(client_id).await.unwrap().unwrap();
        assert_eq!(client.status, "active");
    }

    #[tokio::test]
    async fn policy_update_for_missing_client_is_404() {
        let (_store, service, _client_id) = seeded().await;
        let err = service
            .update_access_policy(ClientId::new(), &default_access_policy())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
