//! Backing-store error taxonomy
//!
//! Every storage driver (relational or managed-backend) reports failures
//! through [`StoreError`] so the HTTP layer can map them uniformly:
//! unique-key violations become conflicts, everything else is an opaque
//! internal failure.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Errors produced by the backing store drivers
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to establish or keep a database connection
    #[error("database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A query failed for a reason other than a constraint violation
    #[error("database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint was violated (duplicate key)
    #[error("conflict: {0}")]
    Conflict(String),

    /// The managed backend returned an error response
    #[error("backend error: {0}")]
    Backend(String),

    /// Invalid or missing configuration
    #[error("store configuration error: {0}")]
    Configuration(String),
}

/// SQLSTATE code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

impl From<SqlxError> for StoreError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::Conflict(db.message().to_string())
            }
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
                StoreError::Connection(err)
            }
            _ => StoreError::Query(err),
        }
    }
}

impl StoreError {
    /// Whether this error is a duplicate-key conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
