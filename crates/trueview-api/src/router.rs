//! Router assembly and shared state.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde_json::json;
use trueview_db::PortalStore;
use trueview_provisioning::ProvisioningService;

use crate::handlers::{
    activate_client_handler, admin_login_handler, dashboard_handler, download_url_handler,
    health_handler, honeybook_webhook_handler, list_clients_handler, login_handler,
    update_access_handler,
};
use crate::middleware::require_session;
use crate::services::{AccessService, AdminService, SessionService};

/// Shared secret for webhook signature verification, cheap to clone into
/// request extensions.
#[derive(Clone)]
pub struct WebhookSecret(Arc<Vec<u8>>);

impl WebhookSecret {
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(Arc::new(secret.into()))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Everything the routers need, assembled once at startup.
#[derive(Clone)]
pub struct PortalState {
    pub store: Arc<dyn PortalStore>,
    pub session_service: Arc<SessionService>,
    pub access_service: Arc<AccessService>,
    pub admin_service: Arc<AdminService>,
    pub provisioning: Arc<ProvisioningService>,
    pub webhook_secret: WebhookSecret,
}

/// Build the portal router.
///
/// Public routes (webhook intake, logins, health) and bearer-protected
/// routes are merged under one tree; unknown paths fall through to the
/// portal's 404 shape.
pub fn portal_router(state: PortalState) -> Router {
    let public = Router::new()
        .route("/api/webhooks/honeybook", post(honeybook_webhook_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/admin/login", post(admin_login_handler))
        .route("/api/health", get(health_handler));

    let protected = Router::new()
        .route("/api/client/dashboard", get(dashboard_handler))
        .route(
            "/api/client/deliverables/:deliverable_id/download",
            get(download_url_handler),
        )
        .route("/api/admin/clients", get(list_clients_handler))
        .route(
            "/api/admin/clients/:client_id/access",
            put(update_access_handler),
        )
        .route(
            "/api/admin/clients/:client_id/activate",
            post(activate_client_handler),
        )
        .layer(middleware::from_fn(require_session));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(not_found_handler)
        .layer(Extension(state.session_service.clone()))
        .layer(Extension(state.access_service.clone()))
        .layer(Extension(state.admin_service.clone()))
        .layer(Extension(state.provisioning.clone()))
        .layer(Extension(state.webhook_secret.clone()))
}

/// Unknown route → the portal's 404 shape.
async fn not_found_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
}
