//! Database module for handling PostgreSQL connections
//!
//! Provides connection pooling, configuration from the environment, and a
//! health check. The pool is created once at startup and shared across
//! request handlers for the life of the process.

use crate::error::{StoreError, StoreResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Pool, Postgres};
use std::env;
use std::time::Duration;

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// How long to wait for a free connection before failing the request
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    pub fn from_env() -> StoreResult<Self> {
        let database_url = env::var("DATABASE_URL").map_err(|_| {
            StoreError::Configuration("DATABASE_URL environment variable not set".to_string())
        })?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let acquire_timeout = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout,
        })
    }
}

/// Initialize a PostgreSQL connection pool
pub async fn init_pool(config: &DatabaseConfig) -> StoreResult<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await
        .map_err(StoreError::Connection)?;

    Ok(pool)
}

/// Check database connectivity
pub async fn health_check(pool: &PgPool) -> StoreResult<bool> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(StoreError::Query)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_defaults() {
        // set_var is unsafe in edition 2024; this test owns these keys.
        unsafe {
            env::set_var("DATABASE_URL", "postgresql://localhost/filmshare_test");
            env::remove_var("DATABASE_MAX_CONNECTIONS");
            env::remove_var("DATABASE_ACQUIRE_TIMEOUT_SECS");
        }

        let config = DatabaseConfig::from_env().expect("config should load");
        assert_eq!(config.database_url, "postgresql://localhost/filmshare_test");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }
}
