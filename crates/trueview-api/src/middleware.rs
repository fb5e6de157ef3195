//! Bearer-session middleware.
//!
//! Extracts the bearer token, verifies it through the session service, and
//! inserts the resulting [`Principal`] into request extensions for the
//! protected handlers. Role checks stay in the handlers so `Forbidden` can
//! be distinguished from `Unauthenticated`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::services::SessionService;

/// Require a valid session; insert the principal into extensions.
pub async fn require_session(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let session = request
        .extensions()
        .get::<Arc<SessionService>>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("Session service missing from request extensions");
            ApiError::Internal("Session service not configured".to_string()).into_response()
        })?;

    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthenticated.into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthenticated.into_response())?;

    if token.is_empty() {
        return Err(ApiError::Unauthenticated.into_response());
    }

    let principal = session
        .authenticate(token)
        .map_err(axum::response::IntoResponse::into_response)?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
