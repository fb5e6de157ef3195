//! Admin endpoints: roster, access policies, activation.
//!
//! Every handler checks the principal's role explicitly; a non-admin
//! session gets `Forbidden` (403), distinct from `Unauthenticated` (401).

use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use trueview_auth::Principal;
use trueview_core::ClientId;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{ClientSummary, UpdateAccessRequest, UpdateAck};
use crate::services::AdminService;

fn require_admin(principal: &Principal) -> Result<(), ApiError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// List all clients, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/clients",
    responses(
        (status = 200, description = "Client roster", body = [ClientSummary]),
        (status = 401, description = "Missing, invalid, or expired session"),
        (status = 403, description = "Not an admin session"),
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_clients_handler(
    Extension(admin): Extension<Arc<AdminService>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<ClientSummary>>, ApiError> {
    require_admin(&principal)?;
    let roster = admin.list_clients().await?;
    Ok(Json(roster))
}

/// Replace a client's per-category deliverable access policy.
#[utoipa::path(
    put,
    path = "/api/admin/clients/{clientId}/access",
    params(("clientId" = Uuid, Path, description = "Client identifier")),
    request_body = UpdateAccessRequest,
    responses(
        (status = 200, description = "Policy replaced", body = UpdateAck),
        (status = 401, description = "Missing, invalid, or expired session"),
        (status = 403, description = "Not an admin session"),
        (status = 404, description = "Unknown client"),
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn update_access_handler(
    Extension(admin): Extension<Arc<AdminService>>,
    Extension(principal): Extension<Principal>,
    Path(client_id): Path<Uuid>,
    Json(request): Json<UpdateAccessRequest>,
) -> Result<Json<UpdateAck>, ApiError> {
    require_admin(&principal)?;
    admin
        .update_access_policy(ClientId::from_uuid(client_id), &request.deliverables_access)
        .await?;
    Ok(Json(UpdateAck {
        success: true,
        message: "Access updated".to_string(),
    }))
}

/// Activate a pending client (deposit confirmed).
#[utoipa::path(
    post,
    path = "/api/admin/clients/{clientId}/activate",
    params(("clientId" = Uuid, Path, description = "Client identifier")),
    responses(
        (status = 200, description = "Client activated", body = UpdateAck),
        (status = 401, description = "Missing, invalid, or expired session"),
        (status = 403, description = "Not an admin session"),
        (status = 404, description = "Unknown client"),
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn activate_client_handler(
    Extension(admin): Extension<Arc<AdminService>>,
    Extension(principal): Extension<Principal>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<UpdateAck>, ApiError> {
    require_admin(&principal)?;
    admin.activate_client(ClientId::from_uuid(client_id)).await?;
    Ok(Json(UpdateAck {
        success: true,
        message: "Client activated".to_string(),
    }))
}
