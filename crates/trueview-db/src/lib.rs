//! Persistence boundary for the TrueView portal.
//!
//! The core never talks SQL directly: it goes through the [`PortalStore`]
//! trait, which owns the Client, Project, Deliverable, TimelineEvent, and
//! AccessLogEntry records. Two implementations ship here:
//!
//! - [`PgStore`]: PostgreSQL via sqlx; email uniqueness is a database
//!   constraint, so the provisioning check-then-create is a single atomic
//!   insert rather than a racy read-then-write.
//! - [`MemoryStore`]: an in-process fake holding one lock over its maps,
//!   giving tests the same atomicity guarantees without a database.

pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::{
    AccessLogEntry, AccessPolicy, Client, Deliverable, NewAccessLog, NewClient, NewDeliverable,
    NewProject, NewTimelineEvent, Project, TimelineEvent,
};
pub use postgres::PgStore;
pub use store::PortalStore;
