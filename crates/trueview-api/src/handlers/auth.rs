//! Login endpoints.

use std::sync::Arc;

use axum::{Extension, Json};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{
    AdminLoginRequest, AdminLoginResponse, LoginRequest, LoginResponse, UserProfile,
};
use crate::services::SessionService;

/// Collapse validator output into one message.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(std::string::ToString::to_string))
        })
        .collect();
    messages.join(", ")
}

/// Client login.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Authentication"
)]
pub async fn login_handler(
    Extension(session): Extension<Arc<SessionService>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(validation_message(&e)))?;

    let (token, client, project) = session.login(&request.username, &request.password).await?;

    Ok(Json(LoginResponse {
        token,
        user: UserProfile {
            client_id: client.id,
            project_id: project.id,
            company_name: client.company_name.clone(),
            contact_name: client.display_name.clone(),
            email: client.email.clone(),
            project_details: project.details.clone(),
            deliverables_access: client.access_policy(),
        },
    }))
}

/// Operator login.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminLoginResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Authentication"
)]
pub async fn admin_login_handler(
    Extension(session): Extension<Arc<SessionService>>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(validation_message(&e)))?;

    let token = session
        .admin_login(&request.username, &request.password)
        .await?;

    Ok(Json(AdminLoginResponse {
        token,
        role: "admin".to_string(),
    }))
}
