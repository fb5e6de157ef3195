//! Request and response models for the portal API.
//!
//! Wire names are camelCase to match the portal frontend and the CRM
//! integration contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trueview_db::AccessPolicy;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Client login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// The client's email address.
    #[validate(email(message = "Username must be a valid email address"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Operator login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Successful client login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Client profile returned at login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub client_id: Uuid,
    pub project_id: Uuid,
    pub company_name: Option<String>,
    pub contact_name: String,
    pub email: String,
    #[schema(value_type = Object)]
    pub project_details: Value,
    #[schema(value_type = Object)]
    pub deliverables_access: AccessPolicy,
}

/// Successful operator login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminLoginResponse {
    pub token: String,
    pub role: String,
}

/// Webhook acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
}

/// Preview / optimized / original rendition URLs for one deliverable.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UrlTriplet {
    pub preview: String,
    pub optimized: String,
    pub original: String,
}

/// One deliverable as shown on the dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliverableView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub download_count: i64,
    pub urls: UrlTriplet,
}

/// One project timeline entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineView {
    pub event_type: String,
    pub title: String,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Dashboard counters.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_files: usize,
    pub images_count: usize,
    pub maps_count: usize,
    pub models_count: usize,
    pub videos_count: usize,
    pub reports_count: usize,
}

/// The client block of the dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientOverview {
    pub company_name: Option<String>,
    pub contact_name: String,
    pub project_id: Uuid,
    pub status: String,
    #[schema(value_type = Object)]
    pub project_details: Value,
    #[schema(value_type = Object)]
    pub deliverables_access: AccessPolicy,
}

/// Full dashboard payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub client: ClientOverview,
    pub deliverables: Vec<DeliverableView>,
    pub timeline: Vec<TimelineView>,
    pub stats: DashboardStats,
}

/// Time-boxed download URL response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessUrlResponse {
    pub success: bool,
    pub download_url: String,
    pub filename: String,
    pub expires_in: u64,
}

/// Admin request to replace a client's access policy.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccessRequest {
    #[schema(value_type = Object)]
    pub deliverables_access: AccessPolicy,
}

/// One roster row for the admin client list.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub client_id: Uuid,
    pub project_id: Option<Uuid>,
    pub company_name: Option<String>,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Generic success acknowledgement for admin mutations.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateAck {
    pub success: bool,
    pub message: String,
}

/// Liveness probe payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}
