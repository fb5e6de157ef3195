//! Deterministic media storage for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use trueview_core::DeliverableKind;

use crate::error::MediaError;
use crate::storage::{MediaStorage, SignedUrl, SizeClass};

/// Mock media storage that records signed-URL requests.
#[derive(Default)]
pub struct MockMediaStorage {
    signed_requests: Mutex<Vec<String>>,
    fail: bool,
}

impl MockMediaStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that fails every signed-URL request.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            signed_requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Storage refs that had download URLs generated.
    #[must_use]
    pub fn signed_requests(&self) -> Vec<String> {
        self.signed_requests.lock().clone()
    }
}

#[async_trait]
impl MediaStorage for MockMediaStorage {
    async fn signed_download_url(
        &self,
        storage_ref: &str,
        _kind: DeliverableKind,
        ttl_secs: u64,
    ) -> Result<SignedUrl, MediaError> {
        if self.fail {
            return Err(MediaError::Unavailable("mock failure".to_string()));
        }
        self.signed_requests.lock().push(storage_ref.to_string());
        Ok(SignedUrl {
            url: format!("https://media.test/signed/{storage_ref}?ttl={ttl_secs}"),
            expires_in: ttl_secs,
        })
    }

    fn transform_url(&self, storage_ref: &str, kind: DeliverableKind, size: SizeClass) -> String {
        let size = match size {
            SizeClass::Thumbnail => "thumb",
            SizeClass::Preview => "preview",
            SizeClass::Optimized => "optimized",
            SizeClass::Original => "original",
        };
        format!("https://media.test/{}/{size}/{storage_ref}", kind.as_str())
    }
}
