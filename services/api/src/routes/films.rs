//! Catalog routes: list, detail, trending, latest

use axum::{
    Json,
    Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    models::FilmIdRequest,
    state::AppState,
};

/// Trending window in days
const TRENDING_WINDOW_DAYS: u32 = 7;
/// Item cap for the trending and latest feeds
const FEED_LIMIT: i64 = 10;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/film", post(detail))
        .route("/trending", get(trending))
        .route("/latest", get(latest))
}

/// All films, unordered
pub async fn list(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let films = state.store.list_films().await?;

    Ok(Json(json!({
        "message": "Films retrieved successfully.",
        "data": films,
    })))
}

/// A single film with its crew
pub async fn detail(
    State(state): State<AppState>,
    Json(payload): Json<FilmIdRequest>,
) -> ApiResult<impl IntoResponse> {
    let film_id = payload.parse().map_err(ApiError::Validation)?;

    let film = state
        .store
        .get_film(film_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Film not found.".to_string()))?;

    let crew = state.store.crew_for_film(film_id).await?;

    Ok(Json(json!({
        "message": "Film retrieved successfully.",
        "film": film,
        "crew": crew,
    })))
}

/// Most-liked films created within the trending window
pub async fn trending(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let films = state
        .store
        .trending_films(TRENDING_WINDOW_DAYS, FEED_LIMIT)
        .await?;

    Ok(Json(json!({
        "message": "Trending films retrieved successfully.",
        "data": films,
    })))
}

/// Most recently created films
pub async fn latest(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let films = state.store.latest_films(FEED_LIMIT).await?;

    Ok(Json(json!({
        "message": "Latest films retrieved successfully.",
        "data": films,
    })))
}
