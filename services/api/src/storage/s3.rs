//! S3 blob storage driver

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use axum::body::Bytes;
use tracing::debug;

use crate::storage::{AssetKind, BlobStore};

/// Writes assets to a bucket per asset class via `put_object`
pub struct S3Storage {
    client: Client,
    film_bucket: String,
    thumbnail_bucket: String,
}

impl S3Storage {
    pub fn new(client: Client, film_bucket: String, thumbnail_bucket: String) -> Self {
        Self {
            client,
            film_bucket,
            thumbnail_bucket,
        }
    }

    fn bucket(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::Film => &self.film_bucket,
            AssetKind::Thumbnail => &self.thumbnail_bucket,
        }
    }
}

#[async_trait]
impl BlobStore for S3Storage {
    async fn put(
        &self,
        kind: AssetKind,
        name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> anyhow::Result<String> {
        let bucket = self.bucket(kind);

        self.client
            .put_object()
            .bucket(bucket)
            .key(name)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await?;

        debug!(bucket, key = name, "asset stored in S3");
        Ok(format!("https://{bucket}.s3.amazonaws.com/{name}"))
    }
}
