//! Request handlers for the portal API.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod deliverables;
pub mod health;
pub mod webhook;

pub use admin::{activate_client_handler, list_clients_handler, update_access_handler};
pub use auth::{admin_login_handler, login_handler};
pub use dashboard::dashboard_handler;
pub use deliverables::download_url_handler;
pub use health::health_handler;
pub use webhook::honeybook_webhook_handler;
