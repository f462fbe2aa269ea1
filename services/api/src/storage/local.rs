//! Local-disk blob storage driver

use async_trait::async_trait;
use axum::body::Bytes;
use std::path::PathBuf;
use tracing::debug;

use crate::storage::{AssetKind, BlobStore};

/// Writes assets under `{root}/{films|thumbnails}/{name}` and returns URLs
/// under the configured public base
pub struct LocalDiskStorage {
    root: PathBuf,
    public_base: String,
}

impl LocalDiskStorage {
    pub fn new(root: PathBuf, public_base: String) -> Self {
        Self {
            root,
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for LocalDiskStorage {
    async fn put(
        &self,
        kind: AssetKind,
        name: &str,
        _content_type: &str,
        bytes: Bytes,
    ) -> anyhow::Result<String> {
        let dir = self.root.join(kind.prefix());
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(name);
        tokio::fs::write(&path, &bytes).await?;

        debug!(path = %path.display(), size = bytes.len(), "asset stored on disk");
        Ok(format!(
            "{}/storage/{}/{}",
            self.public_base,
            kind.prefix(),
            name
        ))
    }
}
