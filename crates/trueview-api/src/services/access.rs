//! The deliverable access controller.
//!
//! Ownership is the authorization rule: the deliverable's project must
//! belong to the requesting principal (or the principal is an admin).
//! Every failure (absent record, foreign record, policy-disabled category)
//! answers `NotFound` so existence is never confirmed across tenants.

use std::sync::Arc;

use trueview_auth::Principal;
use trueview_core::{ClientId, DeliverableId, DeliverableKind};
use trueview_db::models::{Client, Deliverable, Project};
use trueview_db::{NewAccessLog, PortalStore, TimelineEvent};
use trueview_media::{MediaStorage, SizeClass};

use crate::error::ApiError;
use crate::models::{
    ClientOverview, DashboardResponse, DashboardStats, DeliverableView, TimelineView, UrlTriplet,
};

/// Fixed TTL for deliverable download URLs.
pub const DOWNLOAD_URL_TTL_SECS: u64 = 3600;

/// Caller metadata recorded in the access log.
#[derive(Debug, Default, Clone)]
pub struct CallerMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A granted, time-boxed download.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub url: String,
    pub filename: String,
    pub expires_in: u64,
}

/// Authorizes deliverable access and serves dashboard data.
pub struct AccessService {
    store: Arc<dyn PortalStore>,
    media: Arc<dyn MediaStorage>,
}

impl AccessService {
    #[must_use]
    pub fn new(store: Arc<dyn PortalStore>, media: Arc<dyn MediaStorage>) -> Self {
        Self { store, media }
    }

    /// Authorize and grant a time-boxed download URL.
    ///
    /// On success the access log gains exactly one entry and the download
    /// counter is incremented exactly once, before the grant is returned;
    /// a caller disconnect cannot skip the bookkeeping.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] for absent, unowned, or policy-disabled
    /// deliverables; collaborator failures surface as 500s.
    pub async fn request_access(
        &self,
        principal: &Principal,
        deliverable_id: DeliverableId,
        caller: CallerMeta,
    ) -> Result<AccessGrant, ApiError> {
        let deliverable = self
            .store
            .get_deliverable(deliverable_id)
            .await?
            .ok_or(ApiError::NotFound)?;

        let project = self
            .store
            .get_project(deliverable.owner_project_id())
            .await?
            .ok_or(ApiError::NotFound)?;

        let log_client_id = self.authorize(principal, &project, &deliverable).await?;

        let kind = deliverable.kind()?;
        let signed = self
            .media
            .signed_download_url(&deliverable.storage_ref, kind, DOWNLOAD_URL_TTL_SECS)
            .await?;

        self.store
            .append_access_log(NewAccessLog {
                client_id: log_client_id,
                project_id: deliverable.owner_project_id(),
                deliverable_id,
                access_kind: "download".to_string(),
                ip_address: caller.ip_address,
                user_agent: caller.user_agent,
            })
            .await?;
        self.store.increment_download_count(deliverable_id).await?;

        tracing::info!(
            deliverable_id = %deliverable_id,
            client_id = %log_client_id,
            "Deliverable access granted"
        );

        Ok(AccessGrant {
            url: signed.url,
            filename: deliverable.filename,
            expires_in: signed.expires_in,
        })
    }

    /// Ownership + policy check; returns the client id to log against.
    async fn authorize(
        &self,
        principal: &Principal,
        project: &Project,
        deliverable: &Deliverable,
    ) -> Result<ClientId, ApiError> {
        if principal.is_admin() {
            return Ok(project.owner_id());
        }

        let client_id = principal.client_id.ok_or(ApiError::NotFound)?;
        if project.owner_id() != client_id {
            tracing::debug!(
                deliverable_id = %deliverable.deliverable_id(),
                "Cross-tenant deliverable access rejected"
            );
            return Err(ApiError::NotFound);
        }

        let client = self
            .store
            .get_client(client_id)
            .await?
            .ok_or(ApiError::NotFound)?;
        if !client.category_allowed(&deliverable.category) {
            tracing::debug!(
                deliverable_id = %deliverable.deliverable_id(),
                category = %deliverable.category,
                "Access to disabled category rejected"
            );
            return Err(ApiError::NotFound);
        }

        Ok(client_id)
    }

    /// Assemble the client dashboard: overview, deliverables with URL
    /// triplets, timeline, and counters. Categories the access policy
    /// disables are filtered out of the listing.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the principal has no client record.
    pub async fn dashboard(&self, principal: &Principal) -> Result<DashboardResponse, ApiError> {
        let client_id = principal.client_id.ok_or(ApiError::NotFound)?;
        let client = self
            .store
            .get_client(client_id)
            .await?
            .ok_or(ApiError::NotFound)?;
        let project = self
            .store
            .get_project_for_client(client_id)
            .await?
            .ok_or(ApiError::NotFound)?;

        let deliverables = self
            .store
            .list_deliverables(project.project_id())
            .await?
            .into_iter()
            .filter(|d| client.category_allowed(&d.category))
            .collect::<Vec<_>>();

        let views: Vec<DeliverableView> = deliverables
            .iter()
            .filter_map(|d| self.deliverable_view(d).ok())
            .collect();
        let stats = count_stats(&deliverables);

        let timeline = self
            .store
            .list_timeline(project.project_id())
            .await?
            .iter()
            .map(timeline_view)
            .collect();

        Ok(DashboardResponse {
            client: overview(&client, &project),
            deliverables: views,
            timeline,
            stats,
        })
    }

    /// URL triplet per the size-class policy: thumbnail for the list view,
    /// optimized for detail, original preserved for download.
    fn deliverable_view(&self, deliverable: &Deliverable) -> Result<DeliverableView, ApiError> {
        let kind = deliverable.kind()?;
        let urls = UrlTriplet {
            preview: self
                .media
                .transform_url(&deliverable.storage_ref, kind, SizeClass::Thumbnail),
            optimized: self
                .media
                .transform_url(&deliverable.storage_ref, kind, SizeClass::Optimized),
            original: self
                .media
                .transform_url(&deliverable.storage_ref, kind, SizeClass::Original),
        };
        Ok(DeliverableView {
            id: deliverable.id,
            kind: deliverable.kind.clone(),
            category: deliverable.category.clone(),
            filename: deliverable.filename.clone(),
            file_size: deliverable.file_size,
            mime_type: deliverable.mime_type.clone(),
            uploaded_at: deliverable.uploaded_at,
            download_count: deliverable.download_count,
            urls,
        })
    }
}

fn overview(client: &Client, project: &Project) -> ClientOverview {
    ClientOverview {
        company_name: client.company_name.clone(),
        contact_name: client.display_name.clone(),
        project_id: project.id,
        status: client.status.clone(),
        project_details: project.details.clone(),
        deliverables_access: client.access_policy(),
    }
}

fn timeline_view(event: &TimelineEvent) -> TimelineView {
    TimelineView {
        event_type: event.event_type.clone(),
        title: event.title.clone(),
        description: event.description.clone(),
        occurred_at: event.occurred_at,
    }
}

fn count_stats(deliverables: &[Deliverable]) -> DashboardStats {
    let count = |kind: DeliverableKind| {
        deliverables
            .iter()
            .filter(|d| d.kind == kind.as_str())
            .count()
    };
    DashboardStats {
        total_files: deliverables.len(),
        images_count: count(DeliverableKind::Image),
        maps_count: count(DeliverableKind::Map),
        models_count: count(DeliverableKind::Model),
        videos_count: count(DeliverableKind::Video),
        reports_count: count(DeliverableKind::Report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trueview_core::{ClientStatus, ProjectId, Role};
    use trueview_db::models::default_access_policy;
    use trueview_db::{MemoryStore, NewClient, NewDeliverable, NewProject};
    use trueview_media::MockMediaStorage;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: AccessService,
        client_id: ClientId,
        project_id: ProjectId,
        deliverable_id: DeliverableId,
    }

    async fn fixture() -> Fixture {
        fixture_with_policy(default_access_policy()).await
    }

    async fn fixture_with_policy(policy: trueview_db::AccessPolicy) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let client_id = ClientId::new();
        let project_id = ProjectId::new();
        store
            .create_client_with_project(
                NewClient {
                    id: client_id,
                    email: "owner@example.com".to_string(),
                    display_name: "Owner".to_string(),
                    company_name: Some("Acme".to_string()),
                    phone: None,
                    password_hash: "$argon2id$fake".to_string(),
                    role: Role::Client,
                    status: ClientStatus::Active,
                    deliverables_access: policy,
                },
                NewProject {
                    id: project_id,
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

        let deliverable_id = DeliverableId::new();
        store
            .insert_deliverable(NewDeliverable {
                id: deliverable_id,
                project_id,
                kind: DeliverableKind::Image,
                category: "images".to_string(),
                storage_ref: "portal/prj/img_1".to_string(),
                filename: "site.jpg".to_string(),
                file_size: 2048,
                mime_type: "image/jpeg".to_string(),
            })
            .await
            .unwrap();

        let service = AccessService::new(store.clone(), Arc::new(MockMediaStorage::new()));
        Fixture {
            store,
            service,
            client_id,
            project_id,
            deliverable_id,
        }
    }

    fn client_principal(client_id: ClientId, project_id: ProjectId) -> Principal {
        Principal {
            client_id: Some(client_id),
            project_id: Some(project_id),
            email: "owner@example.com".to_string(),
            role: Role::Client,
        }
    }

    fn admin_principal() -> Principal {
        Principal {
            client_id: None,
            project_id: None,
            email: "ops".to_string(),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn owner_access_grants_url_and_bumps_counter_once() {
        let f = fixture().await;
        let principal = client_principal(f.client_id, f.project_id);

        let grant = f
            .service
            .request_access(&principal, f.deliverable_id, CallerMeta::default())
            .await
            .unwrap();

        assert_eq!(grant.expires_in, DOWNLOAD_URL_TTL_SECS);
        assert_eq!(grant.filename, "site.jpg");
        assert!(grant.url.contains("portal/prj/img_1"));

        let stored = f.store.get_deliverable(f.deliverable_id).await.unwrap().unwrap();
        assert_eq!(stored.download_count, 1);
        assert_eq!(f.store.access_log_snapshot().len(), 1);
        assert_eq!(f.store.access_log_snapshot()[0].access_kind, "download");
    }

    #[tokio::test]
    async fn non_owner_gets_not_found_and_no_side_effects() {
        let f = fixture().await;
        // A different client entirely.
        let stranger = client_principal(ClientId::new(), ProjectId::new());

        let err = f
            .service
            .request_access(&stranger, f.deliverable_id, CallerMeta::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotFound));
        let stored = f.store.get_deliverable(f.deliverable_id).await.unwrap().unwrap();
        assert_eq!(stored.download_count, 0);
        assert!(f.store.access_log_snapshot().is_empty());
    }

    #[tokio::test]
    async fn admin_can_access_any_deliverable() {
        let f = fixture().await;
        let grant = f
            .service
            .request_access(&admin_principal(), f.deliverable_id, CallerMeta::default())
            .await
            .unwrap();
        assert_eq!(grant.expires_in, 3600);

        // Logged against the owning client.
        let logs = f.store.access_log_snapshot();
        assert_eq!(logs[0].client_id, *f.client_id.as_uuid());
    }

    #[tokio::test]
    async fn disabled_category_is_masked_as_not_found() {
        let mut policy = default_access_policy();
        policy.insert("images".to_string(), false);
        let f = fixture_with_policy(policy).await;
        let principal = client_principal(f.client_id, f.project_id);

        let err = f
            .service
            .request_access(&principal, f.deliverable_id, CallerMeta::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));

        let stored = f.store.get_deliverable(f.deliverable_id).await.unwrap().unwrap();
        assert_eq!(stored.download_count, 0);
    }

    #[tokio::test]
    async fn unknown_deliverable_is_not_found() {
        let f = fixture().await;
        let principal = client_principal(f.client_id, f.project_id);
        let err = f
            .service
            .request_access(&principal, DeliverableId::new(), CallerMeta::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn dashboard_lists_views_and_counts() {
        let f = fixture().await;
        store_extra_deliverable(&f, DeliverableKind::Map, "maps").await;
        let principal = client_principal(f.client_id, f.project_id);

        let dashboard = f.service.dashboard(&principal).await.unwrap();

        assert_eq!(dashboard.stats.total_files, 2);
        assert_eq!(dashboard.stats.images_count, 1);
        assert_eq!(dashboard.stats.maps_count, 1);
        assert_eq!(dashboard.deliverables.len(), 2);

        let image = dashboard
            .deliverables
            .iter()
            .find(|d| d.kind == "image")
            .unwrap();
        assert!(image.urls.preview.contains("/thumb/"));
        assert!(image.urls.optimized.contains("/optimized/"));
        assert!(image.urls.original.contains("/original/"));
    }

    #[tokio::test]
    async fn dashboard_filters_disabled_categories() {
        let mut policy = default_access_policy();
        policy.insert("maps".to_string(), false);
        let f = fixture_with_policy(policy).await;
        store_extra_deliverable(&f, DeliverableKind::Map, "maps").await;
        let principal = client_principal(f.client_id, f.project_id);

        let dashboard = f.service.dashboard(&principal).await.unwrap();

        assert_eq!(dashboard.stats.total_files, 1);
        assert!(dashboard.deliverables.iter().all(|d| d.kind != "map"));
    }

    async fn store_extra_deliverable(f: &Fixture, kind: DeliverableKind, category: &str) {
        f.store
            .insert_deliverable(NewDeliverable {
                id: DeliverableId::new(),
                project_id: f.project_id,
                kind,
                category: category.to_string(),
                storage_ref: format!("portal/prj/{category}_1"),
                filename: format!("{category}.bin"),
                file_size: 1,
                mime_type: "application/octet-stream".to_string(),
            })
            .await
            .unwrap();
    }
}
