//! Credential primitives for the TrueView portal.
//!
//! Three independent concerns live here:
//! - Argon2id password hashing and verification ([`PasswordHasher`])
//! - HS256 session tokens ([`SessionClaims`], [`encode_token`], [`decode_token`])
//! - Inbound webhook signature verification ([`verify_signature`])
//!
//! All of them are pure with respect to the store and the network, so the
//! crates above this one can be tested without any collaborator running.

pub mod claims;
pub mod error;
pub mod password;
pub mod signature;
pub mod token;

pub use claims::{Principal, SessionClaims};
pub use error::AuthError;
pub use password::{hash_password, verify_password, PasswordHasher};
pub use signature::{compute_signature, verify_signature};
pub use token::{decode_token, encode_token};
