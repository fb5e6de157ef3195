//! Error types for the persistence boundary.

use thiserror::Error;

/// Errors surfaced by [`crate::PortalStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A client with this email already exists. Provisioning treats this as
    /// the idempotent no-op path, not a failure.
    #[error("A client with this email already exists")]
    DuplicateEmail,

    /// The requested record does not exist.
    #[error("Record not found")]
    NotFound,

    /// The backing database failed or is unreachable.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be interpreted (corrupt enum tag, bad JSON).
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}
