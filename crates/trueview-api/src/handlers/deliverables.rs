//! Deliverable download-URL endpoint.

use std::sync::Arc;

use axum::{
    extract::Path,
    http::{header::USER_AGENT, HeaderMap},
    Extension, Json,
};
use trueview_auth::Principal;
use trueview_core::DeliverableId;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::AccessUrlResponse;
use crate::services::{AccessService, CallerMeta};

/// Generate a time-boxed download URL for one deliverable.
///
/// Ownership (or an admin session) is required; anything else answers 404.
#[utoipa::path(
    get,
    path = "/api/client/deliverables/{deliverableId}/download",
    params(("deliverableId" = Uuid, Path, description = "Deliverable identifier")),
    responses(
        (status = 200, description = "Time-boxed URL", body = AccessUrlResponse),
        (status = 401, description = "Missing, invalid, or expired session"),
        (status = 404, description = "Deliverable absent or not owned by the caller"),
    ),
    security(("bearerAuth" = [])),
    tag = "Client"
)]
pub async fn download_url_handler(
    Extension(access): Extension<Arc<AccessService>>,
    Extension(principal): Extension<Principal>,
    Path(deliverable_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<AccessUrlResponse>, ApiError> {
    let caller = CallerMeta {
        ip_address: headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(',').next().unwrap_or(value).trim().to_string()),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(String::from),
    };

    let grant = access
        .request_access(&principal, DeliverableId::from_uuid(deliverable_id), caller)
        .await?;

    Ok(Json(AccessUrlResponse {
        success: true,
        download_url: grant.url,
        filename: grant.filename,
        expires_in: grant.expires_in,
    }))
}
