//! Shared domain types for the TrueView portal.
//!
//! This crate holds the strongly typed identifiers and the small closed
//! enums (role, account status, deliverable kind) that every other portal
//! crate speaks in. It has no I/O and no heavyweight dependencies so it can
//! sit at the bottom of the crate graph.

pub mod ids;
pub mod types;

pub use ids::{ClientId, DeliverableId, ParseIdError, ProjectId};
pub use types::{ClientStatus, DeliverableKind, Role};
