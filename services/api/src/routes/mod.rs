//! Router assembly for the API service

pub mod accounts;
pub mod films;
pub mod interactions;
pub mod upload;

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Create the router for the API service
///
/// Everything except signup, login, and the health check sits behind the
/// access guard.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let protected = Router::new()
        .route("/accounts/session", get(accounts::session))
        .nest("/films", films::router())
        .nest("/upload", upload::router(state.max_upload_bytes))
        .nest("/like", interactions::like_router())
        .nest("/save", interactions::save_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/accounts/signup", post(accounts::signup))
        .route("/accounts/login", post(accounts::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "filmshare-api",
    }))
}
