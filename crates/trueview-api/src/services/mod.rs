//! Services behind the portal handlers.

pub mod access;
pub mod admin;
pub mod session;

pub use access::{AccessGrant, AccessService, CallerMeta, DOWNLOAD_URL_TTL_SECS};
pub use admin::AdminService;
pub use session::{SessionConfig, SessionService};
