//! Error types for the media-storage boundary.

use thiserror::Error;

/// Errors from the media-storage collaborator.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The collaborator is misconfigured (missing credentials).
    #[error("Media storage configuration error: {0}")]
    Configuration(String),

    /// The collaborator failed to produce a URL.
    #[error("Media storage unavailable: {0}")]
    Unavailable(String),
}
