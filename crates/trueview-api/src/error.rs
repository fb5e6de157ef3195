//! Error taxonomy for the portal API.
//!
//! Wire bodies are the portal's `{"error": "..."}` shape. Authentication
//! failures keep their messages generic so responses never leak whether an
//! account, or another tenant's resource, exists. Collaborator failures log
//! their detail and surface as an opaque 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use trueview_db::StoreError;
use trueview_media::MediaError;
use trueview_provisioning::ProvisionError;

/// Error type for the portal API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Webhook signature did not verify. No side effects were performed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Login failed: unknown account, inactive account, or wrong password.
    /// One variant for all three so responses cannot enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, or unverifiable bearer token.
    #[error("Authentication required")]
    Unauthenticated,

    /// Bearer token is valid but past expiry.
    #[error("Session expired")]
    Expired,

    /// Authenticated but lacking the required role.
    #[error("Admin access required")]
    Forbidden,

    /// Resource absent, or owned by someone else; the response is the same
    /// for both so existence is never confirmed across tenants.
    #[error("Not found")]
    NotFound,

    /// Request body failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The persistence collaborator failed.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// The media-storage collaborator failed.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Anything else; detail is logged, never returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            other => ApiError::Store(other),
        }
    }
}

impl From<ProvisionError> for ApiError {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::InvalidPayload(msg) => ApiError::Validation(msg),
            ProvisionError::Store(e) => ApiError::Store(e),
            ProvisionError::Credential(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidSignature => (StatusCode::UNAUTHORIZED, "Invalid signature".to_string()),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            ApiError::Expired => (StatusCode::UNAUTHORIZED, "Session expired".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Admin access required".to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "Store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Media(e) => {
                tracing::error!(error = %e, "Media storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn authentication_errors_are_401() {
        for err in [
            ApiError::InvalidSignature,
            ApiError::InvalidCredentials,
            ApiError::Unauthenticated,
            ApiError::Expired,
        ] {
            let (status, _) = body_of(err).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn forbidden_is_distinct_from_unauthenticated() {
        let (status, _) = body_of(ApiError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let (status, body) =
            body_of(ApiError::Internal("secret detail: db password".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn store_not_found_maps_to_404() {
        let err: ApiError = StoreError::NotFound.into();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }
}
