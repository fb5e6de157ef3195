//! Error types for credential operations.

use thiserror::Error;

/// Errors from password hashing and token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password hashing failed.
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash is not a valid PHC string.
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// Token has expired.
    #[error("Token has expired")]
    TokenExpired,

    /// Token signature did not verify.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token is malformed or carries invalid claims.
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}
