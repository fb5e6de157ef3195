//! Webhook-driven provisioning for the TrueView portal.
//!
//! A verified CRM event flows through [`ProvisioningService::handle_event`]:
//! booking confirmations provision a client + project pair exactly once per
//! email (at-least-once delivery tolerated), update events merge project
//! metadata, everything else is acknowledged and dropped.

pub mod credentials;
pub mod error;
pub mod events;
pub mod orchestrator;

pub use credentials::{CredentialIssuer, IssuedCredentials};
pub use error::ProvisionError;
pub use events::{BookingEvent, ClientInfo, EventClass, ProjectInfo};
pub use orchestrator::{
    ActivationPolicy, ProvisionOutcome, ProvisioningConfig, ProvisioningService,
};
