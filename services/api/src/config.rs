//! Environment-driven application configuration
//!
//! Everything deployment-specific comes from environment variables: listen
//! port, signing secret, backing-store and blob-storage driver selection,
//! and the upload/timeout limits.

use anyhow::{Result, bail};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Which backing-store driver to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Direct relational access via sqlx
    Postgres,
    /// Managed PostgREST-style backend via HTTP
    Rest,
}

/// Which blob-storage driver receives uploaded assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub store_backend: StoreBackend,
    /// Base URL of the managed backend (required for the rest driver)
    pub rest_base_url: Option<String>,
    /// API key for the managed backend (required for the rest driver)
    pub rest_api_key: Option<String>,
    pub jwt_secret: String,
    pub token_expiry_secs: u64,
    pub storage_backend: StorageBackend,
    /// Root directory for the local blob driver
    pub storage_root: PathBuf,
    /// Base URL under which locally stored assets are served
    pub public_base_url: String,
    pub film_bucket: String,
    pub thumbnail_bucket: String,
    pub max_upload_bytes: usize,
    pub request_timeout: Duration,
}

const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 3600;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

impl AppConfig {
    /// Create a new AppConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(4000);

        let store_backend = match env::var("STORE_BACKEND").as_deref() {
            Err(_) | Ok("postgres") => StoreBackend::Postgres,
            Ok("rest") => StoreBackend::Rest,
            Ok(other) => bail!("unknown STORE_BACKEND {other:?} (expected postgres or rest)"),
        };

        let rest_base_url = env::var("REST_BASE_URL").ok();
        let rest_api_key = env::var("REST_API_KEY").ok();
        if store_backend == StoreBackend::Rest && (rest_base_url.is_none() || rest_api_key.is_none())
        {
            bail!("STORE_BACKEND=rest requires REST_BASE_URL and REST_API_KEY");
        }

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let token_expiry_secs = env::var("TOKEN_EXPIRY_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_EXPIRY_SECS);

        let storage_backend = match env::var("STORAGE_BACKEND").as_deref() {
            Err(_) | Ok("local") => StorageBackend::Local,
            Ok("s3") => StorageBackend::S3,
            Ok(other) => bail!("unknown STORAGE_BACKEND {other:?} (expected local or s3)"),
        };

        let storage_root = env::var("STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./storage"));

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        let film_bucket = env::var("FILM_BUCKET").unwrap_or_else(|_| "films".to_string());
        let thumbnail_bucket =
            env::var("THUMBNAIL_BUCKET").unwrap_or_else(|_| "thumbnails".to_string());

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let request_timeout = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        Ok(Self {
            port,
            store_backend,
            rest_base_url,
            rest_api_key,
            jwt_secret,
            token_expiry_secs,
            storage_backend,
            storage_root,
            public_base_url,
            film_bucket,
            thumbnail_bucket,
            max_upload_bytes,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutation is process-global, so everything lives in one
    // test to avoid interleaving with parallel tests.
    #[test]
    fn config_defaults_and_backend_parsing() {
        unsafe {
            env::set_var("JWT_SECRET", "s3cret");
            env::remove_var("PORT");
            env::remove_var("STORE_BACKEND");
            env::remove_var("STORAGE_BACKEND");
            env::remove_var("TOKEN_EXPIRY_SECS");
            env::remove_var("MAX_UPLOAD_BYTES");
            env::remove_var("REQUEST_TIMEOUT_SECS");
            env::remove_var("PUBLIC_BASE_URL");
        }

        let config = AppConfig::from_env().expect("config should load");
        assert_eq!(config.port, 4000);
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.storage_backend, StorageBackend::Local);
        assert_eq!(config.token_expiry_secs, 3600);
        assert_eq!(config.max_upload_bytes, 256 * 1024 * 1024);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.public_base_url, "http://localhost:4000");

        unsafe {
            env::set_var("STORE_BACKEND", "cassandra");
        }
        assert!(AppConfig::from_env().is_err());

        // rest driver demands its connection settings
        unsafe {
            env::set_var("STORE_BACKEND", "rest");
            env::remove_var("REST_BASE_URL");
            env::remove_var("REST_API_KEY");
        }
        assert!(AppConfig::from_env().is_err());

        unsafe {
            env::remove_var("STORE_BACKEND");
        }
    }
}
