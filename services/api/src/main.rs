use anyhow::Result;
use aws_config::BehaviorVersion;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::database::{DatabaseConfig, health_check, init_pool};
use filmshare_api::config::{AppConfig, StorageBackend, StoreBackend};
use filmshare_api::jwt::JwtService;
use filmshare_api::routes;
use filmshare_api::state::AppState;
use filmshare_api::storage::local::LocalDiskStorage;
use filmshare_api::storage::s3::S3Storage;
use filmshare_api::storage::BlobStore;
use filmshare_api::store::postgres::PostgresStore;
use filmshare_api::store::rest::RestStore;
use filmshare_api::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting filmshare API service");

    let config = AppConfig::from_env()?;

    let mut pg_pool: Option<PgPool> = None;
    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;
            health_check(&pool).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database connection successful");

            pg_pool = Some(pool.clone());
            Arc::new(PostgresStore::new(pool))
        }
        StoreBackend::Rest => {
            // Presence is enforced by AppConfig::from_env.
            let base_url = config.rest_base_url.as_deref().unwrap_or_default();
            let api_key = config.rest_api_key.as_deref().unwrap_or_default();
            info!("Using managed backend at {base_url}");
            Arc::new(RestStore::new(base_url, api_key)?)
        }
    };

    let blobs: Arc<dyn BlobStore> = match config.storage_backend {
        StorageBackend::Local => Arc::new(LocalDiskStorage::new(
            config.storage_root.clone(),
            config.public_base_url.clone(),
        )),
        StorageBackend::S3 => {
            let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
            Arc::new(S3Storage::new(
                aws_sdk_s3::Client::new(&aws),
                config.film_bucket.clone(),
                config.thumbnail_bucket.clone(),
            ))
        }
    };

    let jwt = JwtService::new(config.jwt_secret.as_bytes(), config.token_expiry_secs);

    let state = AppState {
        store,
        blobs,
        jwt,
        max_upload_bytes: config.max_upload_bytes,
    };

    let app = routes::create_router(state, config.request_timeout);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("API service listening on 0.0.0.0:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pg_pool {
        pool.close().await;
        info!("Database pool closed");
    }

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Shutdown signal received");
}
