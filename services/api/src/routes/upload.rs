//! Upload routes: film metadata creation and asset file ingest

use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthAccount,
    models::{NewCrewMember, NewFilm},
    state::AppState,
    storage::{AssetKind, stored_name},
    validation,
};

/// Request for film metadata creation
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFilmRequest {
    #[serde(default)]
    pub film_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub crew: Vec<NewCrewMember>,
}

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(create_film))
        .route("/file/film", post(upload_film_file))
        .route("/file/thumbnail", post(upload_thumbnail_file))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Create a film with its crew, as one atomic unit
pub async fn create_film(
    State(state): State<AppState>,
    Extension(account): Extension<AuthAccount>,
    Json(payload): Json<CreateFilmRequest>,
) -> ApiResult<impl IntoResponse> {
    let (Some(film_url), Some(thumbnail_url), Some(title), Some(genre)) = (
        payload.film_url,
        payload.thumbnail_url,
        payload.title,
        payload.genre,
    ) else {
        return Err(ApiError::Validation(
            "Urls, title and genre are required.".to_string(),
        ));
    };

    for (value, field) in [
        (&film_url, "Film url"),
        (&thumbnail_url, "Thumbnail url"),
        (&title, "Title"),
        (&genre, "Genre"),
    ] {
        validation::require(value, field).map_err(ApiError::Validation)?;
    }

    let film = state
        .store
        .create_film(&NewFilm {
            account_id: account.id,
            film_url,
            thumbnail_url,
            title,
            description: payload.description,
            genre,
            crew: payload.crew,
        })
        .await?;

    info!(film_id = %film.id, owner = %account.id, "film created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Film upload successful.",
            "data": film,
        })),
    ))
}

/// Ingest a film file from the `film` multipart field
pub async fn upload_film_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Response> {
    ingest(state, AssetKind::Film, multipart).await
}

/// Ingest a thumbnail file from the `thumbnail` multipart field
pub async fn upload_thumbnail_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Response> {
    ingest(state, AssetKind::Thumbnail, multipart).await
}

/// Map a multipart read failure. The configured body limit trips mid-read
/// and must keep its 413 identity instead of folding into the generic 400.
fn ingest_error(err: MultipartError, context: &str) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::Ingest(context.to_string())
    }
}

async fn ingest(state: AppState, kind: AssetKind, mut multipart: Multipart) -> ApiResult<Response> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ingest_error(e, "Malformed multipart payload."))?
    {
        if field.name() != Some(kind.field_name()) {
            continue;
        }

        let original = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Ingest("Content type is required.".to_string()))?;

        if !kind.allows(&content_type) {
            return Err(ApiError::Ingest(format!(
                "Unsupported content type {content_type}."
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ingest_error(e, "Failed to read file payload."))?;

        let name = stored_name(&original);
        let url = state
            .blobs
            .put(kind, &name, &content_type, bytes)
            .await
            .map_err(|e| {
                error!("blob store write failed: {e}");
                ApiError::Internal
            })?;

        info!(stored = name, "asset ingested");

        return Ok((
            StatusCode::CREATED,
            Json(json!({
                "message": "Upload successful.",
                "url": url,
            })),
        )
            .into_response());
    }

    Err(ApiError::Ingest("File not found".to_string()))
}
