//! Film and crew models and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Film entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Film {
    pub id: Uuid,
    /// Owning account, set at creation and never reassigned
    pub account_id: Uuid,
    pub film_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: Option<String>,
    pub genre: String,
    pub created_at: DateTime<Utc>,
}

/// Crew member attached to a film
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CrewMember {
    pub id: Uuid,
    pub film_id: Uuid,
    pub role: String,
    pub name: String,
    pub email: Option<String>,
}

/// Crew member as submitted at film creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCrewMember {
    pub role: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Film creation payload, crew included so the insert is one atomic unit
#[derive(Debug, Clone)]
pub struct NewFilm {
    pub account_id: Uuid,
    pub film_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: Option<String>,
    pub genre: String,
    pub crew: Vec<NewCrewMember>,
}

/// Request body carrying a film id (`{"filmId": ...}`)
///
/// The id is kept as an optional string at the serde level so both a
/// missing field and a malformed id surface as a 400 with a useful message
/// instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmIdRequest {
    #[serde(default)]
    pub film_id: Option<String>,
}

impl FilmIdRequest {
    /// Extract the id, distinguishing missing from malformed
    pub fn parse(&self) -> Result<Uuid, String> {
        let raw = self
            .film_id
            .as_deref()
            .ok_or_else(|| "Film id is required.".to_string())?;
        Uuid::parse_str(raw).map_err(|_| "Film id is malformed.".to_string())
    }
}
