//! Application state shared across handlers
//!
//! All long-lived handles (storage driver, blob driver, token service) are
//! built once at startup and injected here; handlers never reach for
//! globals.

use std::sync::Arc;

use crate::jwt::JwtService;
use crate::storage::BlobStore;
use crate::store::Store;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub blobs: Arc<dyn BlobStore>,
    pub jwt: JwtService,
    pub max_upload_bytes: usize,
}
