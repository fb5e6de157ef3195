//! Cloudinary-backed media storage.
//!
//! URLs are assembled locally from the stored public id: rendition URLs get
//! a transformation segment chosen by deliverable kind and size class, and
//! download URLs carry an HMAC-SHA256 token (`__cld_token__`) binding the
//! path to a start time and expiry.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use trueview_core::DeliverableKind;

use crate::error::MediaError;
use crate::storage::{MediaStorage, SignedUrl, SizeClass};

type HmacSha256 = Hmac<Sha256>;

/// Credentials and addressing for a Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// Account cloud name (first URL path segment).
    pub cloud_name: String,
    /// API key (not embedded in URLs; kept for parity with upload tooling).
    pub api_key: String,
    /// Secret used to sign expiring download tokens.
    pub api_secret: String,
}

/// Media storage backed by Cloudinary delivery URLs.
#[derive(Clone)]
pub struct CloudinaryStorage {
    config: CloudinaryConfig,
}

impl CloudinaryStorage {
    #[must_use]
    pub fn new(config: CloudinaryConfig) -> Self {
        Self { config }
    }

    fn base_url(&self, kind: DeliverableKind) -> String {
        format!(
            "https://res.cloudinary.com/{}/{}/upload",
            self.config.cloud_name,
            resource_type(kind)
        )
    }

    /// Signed token over `{expiry}:{path}`; binds the URL to its deadline.
    fn token_for(&self, path: &str, start: i64, expiry: i64) -> String {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.config.api_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(format!("st={start}~exp={expiry}~acl={path}").as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());
        format!("st={start}~exp={expiry}~hmac={digest}")
    }
}

/// Cloudinary resource type segment per deliverable kind.
fn resource_type(kind: DeliverableKind) -> &'static str {
    match kind {
        DeliverableKind::Video => "video",
        DeliverableKind::Report => "raw",
        _ => "image",
    }
}

/// Transformation segment per kind and size class.
///
/// These mirror the delivery presets the upload pipeline applies: capped
/// dimensions, automatic quality, webp for stills, h264 mp4 for video.
fn transformation(kind: DeliverableKind, size: SizeClass) -> Option<&'static str> {
    match (kind, size) {
        (_, SizeClass::Original) => None,
        (DeliverableKind::Video, SizeClass::Thumbnail | SizeClass::Preview) => {
            Some("so_10p,w_400,h_300,c_fill,f_jpg")
        }
        (DeliverableKind::Video, SizeClass::Optimized) => Some("q_auto:good,f_mp4,vc_h264"),
        (DeliverableKind::Map, SizeClass::Thumbnail) => Some("w_400,h_300,c_fill,q_auto:good,f_webp"),
        (DeliverableKind::Map, SizeClass::Preview | SizeClass::Optimized) => {
            Some("w_2048,c_limit,q_auto:best,f_webp")
        }
        (DeliverableKind::Model, SizeClass::Thumbnail) => {
            Some("w_400,h_300,c_fill,q_auto:good,f_webp")
        }
        (DeliverableKind::Model, SizeClass::Preview | SizeClass::Optimized) => {
            Some("w_800,h_600,c_fill,q_auto:good,f_webp")
        }
        (DeliverableKind::Report, _) => None,
        (_, SizeClass::Thumbnail) => Some("w_400,h_300,c_fill,g_auto,q_auto:good,f_webp"),
        (_, SizeClass::Preview) => Some("w_1200,c_limit,q_auto:good,f_webp"),
        (_, SizeClass::Optimized) => Some("w_1920,h_1080,c_limit,q_auto:good,f_webp"),
    }
}

#[async_trait]
impl MediaStorage for CloudinaryStorage {
    async fn signed_download_url(
        &self,
        storage_ref: &str,
        kind: DeliverableKind,
        ttl_secs: u64,
    ) -> Result<SignedUrl, MediaError> {
        if self.config.api_secret.is_empty() {
            return Err(MediaError::Configuration(
                "Cloudinary API secret is not set".to_string(),
            ));
        }

        let start = Utc::now().timestamp();
        let expiry = start + ttl_secs as i64;
        let path = format!("fl_attachment/{storage_ref}");
        let token = self.token_for(&path, start, expiry);

        Ok(SignedUrl {
            url: format!("{}/{}?__cld_token__={}", self.base_url(kind), path, token),
            expires_in: ttl_secs,
        })
    }

    fn transform_url(&self, storage_ref: &str, kind: DeliverableKind, size: SizeClass) -> String {
        match transformation(kind, size) {
            Some(t) => format!("{}/{}/{}", self.base_url(kind), t, storage_ref),
            None => format!("{}/{}", self.base_url(kind), storage_ref),
        }
    }
}
