//! Shared infrastructure for the filmshare backend
//!
//! This crate provides the pieces the service binary and its tests both
//! need: database configuration and pooling, and the backing-store error
//! taxonomy.

pub mod database;
pub mod error;
