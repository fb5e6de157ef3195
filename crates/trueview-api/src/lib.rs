//! HTTP surface of the TrueView portal.
//!
//! Routes:
//! - `POST /api/webhooks/honeybook` - signed CRM event intake
//! - `POST /api/auth/login` - client session
//! - `POST /api/admin/login` - operator session
//! - `GET  /api/client/dashboard` - client overview (bearer)
//! - `GET  /api/client/deliverables/:id/download` - time-boxed URL (bearer)
//! - `GET  /api/admin/clients` - roster (admin bearer)
//! - `PUT  /api/admin/clients/:id/access` - access policy (admin bearer)
//! - `POST /api/admin/clients/:id/activate` - deposit-gated activation
//! - `GET  /api/health` - liveness

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;

pub use error::ApiError;
pub use router::{portal_router, PortalState, WebhookSecret};
pub use services::{
    AccessService, AdminService, SessionConfig, SessionService, DOWNLOAD_URL_TTL_SECS,
};
