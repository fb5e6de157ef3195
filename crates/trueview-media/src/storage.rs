//! The `MediaStorage` trait and the size-class policy.

use async_trait::async_trait;
use trueview_core::DeliverableKind;

use crate::error::MediaError;

/// Which rendition of a deliverable to serve.
///
/// The access controller picks the class; the storage implementation owns
/// the concrete transformation parameters behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// Small rendition for list views.
    Thumbnail,
    /// Mid-size rendition for detail views.
    Preview,
    /// Full-quality optimized rendition for in-portal viewing.
    Optimized,
    /// The untouched upload, preserved for download.
    Original,
}

/// A time-boxed retrieval URL.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    /// The URL to hand to the caller.
    pub url: String,
    /// Seconds until the URL stops working.
    pub expires_in: u64,
}

/// Capability the portal consumes for serving delivered files.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Produce a time-boxed download URL for a stored object.
    ///
    /// # Errors
    ///
    /// [`MediaError::Unavailable`] when the collaborator cannot produce a URL.
    async fn signed_download_url(
        &self,
        storage_ref: &str,
        kind: DeliverableKind,
        ttl_secs: u64,
    ) -> Result<SignedUrl, MediaError>;

    /// Produce a public rendition URL for a stored object at a size class.
    fn transform_url(&self, storage_ref: &str, kind: DeliverableKind, size: SizeClass) -> String;
}
