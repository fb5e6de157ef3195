//! Client dashboard endpoint.

use std::sync::Arc;

use axum::{Extension, Json};
use trueview_auth::Principal;

use crate::error::ApiError;
use crate::models::DashboardResponse;
use crate::services::AccessService;

/// Client dashboard: overview, deliverables with URL triplets, timeline,
/// counters. Requires a client session.
#[utoipa::path(
    get,
    path = "/api/client/dashboard",
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 401, description = "Missing, invalid, or expired session"),
        (status = 404, description = "No client record for this session"),
    ),
    security(("bearerAuth" = [])),
    tag = "Client"
)]
pub async fn dashboard_handler(
    Extension(access): Extension<Arc<AccessService>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let dashboard = access.dashboard(&principal).await?;
    Ok(Json(dashboard))
}
