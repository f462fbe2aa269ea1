//! Filmshare API service
//!
//! A CRUD backend for a short-film sharing application: account signup and
//! login, film metadata, per-account like/save interactions, and binary
//! asset ingest. One HTTP surface over two interchangeable storage drivers
//! (direct PostgreSQL or a managed PostgREST-style backend) plus two blob
//! drivers (local disk or S3), all selected by configuration.

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
pub mod validation;
