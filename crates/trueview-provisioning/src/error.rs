//! Error types for provisioning.

use thiserror::Error;
use trueview_auth::AuthError;
use trueview_db::StoreError;

/// Errors from the provisioning orchestrator.
///
/// Duplicate provisioning is deliberately *not* here: it is an outcome
/// ([`crate::ProvisionOutcome::AlreadyProvisioned`]), not a failure.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The event payload is missing required fields.
    #[error("Invalid event payload: {0}")]
    InvalidPayload(String),

    /// The store rejected a write for a reason other than duplication.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Hashing the temporary password failed.
    #[error("Credential hashing failed: {0}")]
    Credential(#[from] AuthError),
}
