//! Asset ingest: blob storage drivers and naming
//!
//! Uploaded files are stored under a collision-resistant generated name and
//! the driver returns a publicly retrievable URL. Two interchangeable
//! drivers exist: local disk and S3, selected by configuration.

pub mod local;
pub mod s3;

use async_trait::async_trait;
use axum::body::Bytes;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::path::Path;

/// The two asset classes the ingest endpoints accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Film,
    Thumbnail,
}

impl AssetKind {
    /// Multipart field name carrying the file
    pub fn field_name(self) -> &'static str {
        match self {
            AssetKind::Film => "film",
            AssetKind::Thumbnail => "thumbnail",
        }
    }

    /// Storage path prefix
    pub fn prefix(self) -> &'static str {
        match self {
            AssetKind::Film => "films",
            AssetKind::Thumbnail => "thumbnails",
        }
    }

    /// Content-type allow-list per asset class
    pub fn allows(self, content_type: &str) -> bool {
        match self {
            AssetKind::Film => matches!(
                content_type,
                "video/mp4" | "video/webm" | "video/quicktime"
            ),
            AssetKind::Thumbnail => {
                matches!(content_type, "image/jpeg" | "image/png" | "image/webp")
            }
        }
    }
}

/// Generate a stored name: unix millis, a random suffix, and the original
/// extension
pub fn stored_name(original: &str) -> String {
    let ext = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();

    format!("{millis}-{suffix}{ext}")
}

/// Blob storage interface implemented by the local-disk and S3 drivers
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist the bytes under `name` and return a publicly retrievable URL
    async fn put(
        &self,
        kind: AssetKind,
        name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> anyhow::Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_name_keeps_the_extension() {
        let name = stored_name("weekend cut.mp4");
        assert!(name.ends_with(".mp4"));

        let bare = stored_name("noextension");
        assert!(!bare.contains('.'));
    }

    #[test]
    fn stored_names_do_not_collide() {
        let a = stored_name("clip.mp4");
        let b = stored_name("clip.mp4");
        assert_ne!(a, b);
    }

    #[test]
    fn content_type_allow_lists_are_per_kind() {
        assert!(AssetKind::Film.allows("video/mp4"));
        assert!(!AssetKind::Film.allows("image/png"));
        assert!(AssetKind::Thumbnail.allows("image/png"));
        assert!(!AssetKind::Thumbnail.allows("video/mp4"));
        assert!(!AssetKind::Film.allows("application/octet-stream"));
    }
}
