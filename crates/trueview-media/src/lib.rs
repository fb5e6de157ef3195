//! Media-storage collaborator boundary.
//!
//! The portal never embeds transformation parameters in its core logic; it
//! only decides *which size class* to request per deliverable kind and asks
//! this crate for URLs. The CDN-backed implementation builds Cloudinary-style
//! delivery URLs with an HMAC-signed expiring token for downloads.

pub mod cloudinary;
pub mod error;
pub mod mock;
pub mod storage;

pub use cloudinary::{CloudinaryConfig, CloudinaryStorage};
pub use error::MediaError;
pub use mock::MockMediaStorage;
pub use storage::{MediaStorage, SignedUrl, SizeClass};
