//! Like and save routes
//!
//! The two namespaces are structurally identical state machines over
//! different tables, so the handlers share one set of generic helpers and
//! only differ in the kind they pass down.

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthAccount,
    models::FilmIdRequest,
    state::AppState,
    store::InteractionKind,
};

pub fn like_router() -> Router<AppState> {
    Router::new()
        .route("/", post(toggle_like))
        .route("/check", post(check_like))
        .route("/like", post(add_like))
        .route("/dislike", post(remove_like))
        .route("/list", get(liked_films))
}

pub fn save_router() -> Router<AppState> {
    Router::new()
        .route("/", post(toggle_save))
        .route("/check", post(check_save))
        .route("/save", post(add_save))
        .route("/unsave", post(remove_save))
        .route("/watchlist", get(watchlist))
}

/// JSON flag name carrying the state for each namespace
fn flag(kind: InteractionKind) -> &'static str {
    match kind {
        InteractionKind::Like => "isLiked",
        InteractionKind::Save => "isSaved",
    }
}

fn state_body(kind: InteractionKind, message: &str, present: bool) -> Value {
    json!({
        "message": message,
        flag(kind): present,
    })
}

fn required_film_id(payload: FilmIdRequest) -> ApiResult<Uuid> {
    payload.parse().map_err(ApiError::Validation)
}

async fn toggle(
    state: AppState,
    kind: InteractionKind,
    account: AuthAccount,
    payload: FilmIdRequest,
) -> ApiResult<Response> {
    let film_id = required_film_id(payload)?;

    let present = state
        .store
        .toggle_interaction(kind, account.id, film_id)
        .await?;

    // 201 when the row was created, 200 when it was removed.
    let status = if present {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(state_body(kind, "Toggled successfully.", present))).into_response())
}

async fn check(
    state: AppState,
    kind: InteractionKind,
    account: AuthAccount,
    payload: FilmIdRequest,
) -> ApiResult<Response> {
    let film_id = required_film_id(payload)?;

    let present = state
        .store
        .interaction_exists(kind, account.id, film_id)
        .await?;

    Ok(Json(state_body(kind, "Checked successfully.", present)).into_response())
}

async fn add(
    state: AppState,
    kind: InteractionKind,
    account: AuthAccount,
    payload: FilmIdRequest,
    message: &str,
) -> ApiResult<Response> {
    let film_id = required_film_id(payload)?;

    state.store.add_interaction(kind, account.id, film_id).await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": message }))).into_response())
}

async fn remove(
    state: AppState,
    kind: InteractionKind,
    account: AuthAccount,
    payload: FilmIdRequest,
    message: &str,
) -> ApiResult<Response> {
    let film_id = required_film_id(payload)?;

    state
        .store
        .remove_interaction(kind, account.id, film_id)
        .await?;

    Ok(Json(json!({ "message": message })).into_response())
}

async fn listing(
    state: AppState,
    kind: InteractionKind,
    account: AuthAccount,
) -> ApiResult<Response> {
    let films = state.store.films_for_interaction(kind, account.id).await?;

    Ok(Json(json!({
        "message": "Films retrieved successfully.",
        "data": films,
    }))
    .into_response())
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(account): Extension<AuthAccount>,
    Json(payload): Json<FilmIdRequest>,
) -> ApiResult<Response> {
    toggle(state, InteractionKind::Like, account, payload).await
}

pub async fn check_like(
    State(state): State<AppState>,
    Extension(account): Extension<AuthAccount>,
    Json(payload): Json<FilmIdRequest>,
) -> ApiResult<Response> {
    check(state, InteractionKind::Like, account, payload).await
}

pub async fn add_like(
    State(state): State<AppState>,
    Extension(account): Extension<AuthAccount>,
    Json(payload): Json<FilmIdRequest>,
) -> ApiResult<Response> {
    add(state, InteractionKind::Like, account, payload, "Liked successfully").await
}

pub async fn remove_like(
    State(state): State<AppState>,
    Extension(account): Extension<AuthAccount>,
    Json(payload): Json<FilmIdRequest>,
) -> ApiResult<Response> {
    remove(state, InteractionKind::Like, account, payload, "Disliked successfully").await
}

pub async fn liked_films(
    State(state): State<AppState>,
    Extension(account): Extension<AuthAccount>,
) -> ApiResult<Response> {
    listing(state, InteractionKind::Like, account).await
}

pub async fn toggle_save(
    State(state): State<AppState>,
    Extension(account): Extension<AuthAccount>,
    Json(payload): Json<FilmIdRequest>,
) -> ApiResult<Response> {
    toggle(state, InteractionKind::Save, account, payload).await
}

pub async fn check_save(
    State(state): State<AppState>,
    Extension(account): Extension<AuthAccount>,
    Json(payload): Json<FilmIdRequest>,
) -> ApiResult<Response> {
    check(state, InteractionKind::Save, account, payload).await
}

pub async fn add_save(
    State(state): State<AppState>,
    Extension(account): Extension<AuthAccount>,
    Json(payload): Json<FilmIdRequest>,
) -> ApiResult<Response> {
    add(state, InteractionKind::Save, account, payload, "Saved successfully").await
}

pub async fn remove_save(
    State(state): State<AppState>,
    Extension(account): Extension<AuthAccount>,
    Json(payload): Json<FilmIdRequest>,
) -> ApiResult<Response> {
    remove(state, InteractionKind::Save, account, payload, "Unsaved successfully").await
}

pub async fn watchlist(
    State(state): State<AppState>,
    Extension(account): Extension<AuthAccount>,
) -> ApiResult<Response> {
    listing(state, InteractionKind::Save, account).await
}
