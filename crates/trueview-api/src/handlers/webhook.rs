//! CRM webhook intake.
//!
//! POST /api/webhooks/honeybook. Signature verification happens against
//! the exact raw body bytes before anything is parsed; a bad signature
//! produces a 401 with **no** side effects of any kind.

use std::sync::Arc;

use axum::{body::Bytes, http::HeaderMap, Extension, Json};
use trueview_auth::verify_signature;
use trueview_provisioning::{BookingEvent, ProvisionOutcome, ProvisioningService};

use crate::error::ApiError;
use crate::models::WebhookAck;
use crate::router::WebhookSecret;

/// Header carrying the hex HMAC-SHA256 of the raw body.
const SIGNATURE_HEADER: &str = "x-honeybook-signature";

/// Handle a CRM event delivery.
#[utoipa::path(
    post,
    path = "/api/webhooks/honeybook",
    request_body = String,
    responses(
        (status = 200, description = "Event processed (including idempotent no-ops)", body = WebhookAck),
        (status = 401, description = "Invalid signature"),
        (status = 500, description = "Internal failure; the CRM will redeliver"),
    ),
    tag = "Webhooks"
)]
pub async fn honeybook_webhook_handler(
    Extension(provisioning): Extension<Arc<ProvisioningService>>,
    Extension(secret): Extension<WebhookSecret>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if !verify_signature(&body, signature, secret.as_bytes()) {
        tracing::warn!("Webhook rejected: invalid signature");
        return Err(ApiError::InvalidSignature);
    }

    let event: BookingEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("Invalid event payload: {e}")))?;

    let outcome = provisioning.handle_event(event).await?;
    Ok(Json(WebhookAck {
        success: true,
        message: ack_message(&outcome).to_string(),
    }))
}

fn ack_message(outcome: &ProvisionOutcome) -> &'static str {
    match outcome {
        ProvisionOutcome::Provisioned { .. } => "Client provisioned",
        ProvisionOutcome::AlreadyProvisioned => "Already provisioned",
        ProvisionOutcome::MetadataMerged => "Project updated",
        ProvisionOutcome::DroppedUnknownClient => "No matching client",
        ProvisionOutcome::Ignored => "Event ignored",
    }
}
