//! Managed-backend storage driver
//!
//! Speaks the PostgREST dialect (as exposed by Supabase-style backends):
//! filtered GETs for reads, `Prefer` headers for writes, and `/rpc/<fn>`
//! calls for the operations that must execute atomically server-side
//! (toggle, film-with-crew creation, trending aggregation).

use async_trait::async_trait;
use common::error::{StoreError, StoreResult};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{Account, CrewMember, Film, NewAccount, NewFilm};
use crate::store::{InteractionKind, Store};

/// Storage driver over a PostgREST-style HTTP API
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
}

/// Shape of an embedded-resource row from `saves?select=films(*)`
#[derive(Deserialize)]
struct EmbeddedFilm {
    films: Film,
}

impl RestStore {
    /// Create a new driver for the backend at `base_url`, authenticating
    /// every request with `api_key`
    pub fn new(base_url: &str, api_key: &str) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key).map_err(|_| {
            StoreError::Configuration("REST_API_KEY contains invalid characters".to_string())
        })?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
            StoreError::Configuration("REST_API_KEY contains invalid characters".to_string())
        })?;
        bearer.set_sensitive(true);
        headers.insert("apikey", key);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT {
            Err(StoreError::Conflict(detail))
        } else {
            Err(StoreError::Backend(format!("{status}: {detail}")))
        }
    }

    async fn fetch_rows<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> StoreResult<Vec<T>> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| StoreError::Backend(format!("malformed backend response: {e}")))
    }

    fn eq(value: impl ToString) -> String {
        format!("eq.{}", value.to_string())
    }
}

#[async_trait]
impl Store for RestStore {
    async fn create_account(&self, new: &NewAccount) -> StoreResult<Account> {
        let rows: Vec<Account> = self
            .fetch_rows(
                self.client
                    .post(self.url("accounts"))
                    .header("Prefer", "return=representation")
                    .json(new),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend("insert returned no representation".to_string()))
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let rows: Vec<Account> = self
            .fetch_rows(
                self.client
                    .get(self.url("accounts"))
                    .query(&[("email", Self::eq(email)), ("limit", "1".to_string())]),
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn list_films(&self) -> StoreResult<Vec<Film>> {
        self.fetch_rows(self.client.get(self.url("films"))).await
    }

    async fn get_film(&self, film_id: Uuid) -> StoreResult<Option<Film>> {
        let rows: Vec<Film> = self
            .fetch_rows(
                self.client
                    .get(self.url("films"))
                    .query(&[("id", Self::eq(film_id))]),
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn crew_for_film(&self, film_id: Uuid) -> StoreResult<Vec<CrewMember>> {
        self.fetch_rows(
            self.client
                .get(self.url("crew"))
                .query(&[("film_id", Self::eq(film_id))]),
        )
        .await
    }

    async fn trending_films(&self, window_days: u32, limit: i64) -> StoreResult<Vec<Film>> {
        self.fetch_rows(self.client.post(self.url("rpc/trending_films")).json(&json!({
            "p_window_days": window_days,
            "p_limit": limit,
        })))
        .await
    }

    async fn latest_films(&self, limit: i64) -> StoreResult<Vec<Film>> {
        self.fetch_rows(self.client.get(self.url("films")).query(&[
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ]))
        .await
    }

    async fn create_film(&self, new: &NewFilm) -> StoreResult<Film> {
        let response = self
            .send(
                self.client
                    .post(self.url("rpc/create_film_with_crew"))
                    .json(&json!({
                        "p_account_id": new.account_id,
                        "p_film_url": new.film_url,
                        "p_thumbnail_url": new.thumbnail_url,
                        "p_title": new.title,
                        "p_description": new.description,
                        "p_genre": new.genre,
                        "p_crew": new.crew,
                    })),
            )
            .await?;

        response
            .json()
            .await
            .map_err(|e| StoreError::Backend(format!("malformed backend response: {e}")))
    }

    async fn interaction_exists(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<bool> {
        let rows: Vec<serde_json::Value> = self
            .fetch_rows(self.client.get(self.url(kind.table())).query(&[
                ("account_id", Self::eq(account_id)),
                ("film_id", Self::eq(film_id)),
                ("select", "id".to_string()),
                ("limit", "1".to_string()),
            ]))
            .await?;

        Ok(!rows.is_empty())
    }

    async fn toggle_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<bool> {
        let response = self
            .send(
                self.client
                    .post(self.url(&format!("rpc/{}", kind.toggle_rpc())))
                    .json(&json!({
                        "p_account_id": account_id,
                        "p_film_id": film_id,
                    })),
            )
            .await?;

        response
            .json()
            .await
            .map_err(|e| StoreError::Backend(format!("malformed backend response: {e}")))
    }

    async fn add_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<()> {
        self.send(
            self.client
                .post(self.url(kind.table()))
                .query(&[("on_conflict", "account_id,film_id")])
                .header("Prefer", "resolution=ignore-duplicates")
                .json(&json!({
                    "account_id": account_id,
                    "film_id": film_id,
                })),
        )
        .await?;

        Ok(())
    }

    async fn remove_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<()> {
        self.send(self.client.delete(self.url(kind.table())).query(&[
            ("account_id", Self::eq(account_id)),
            ("film_id", Self::eq(film_id)),
        ]))
        .await?;

        Ok(())
    }

    async fn films_for_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
    ) -> StoreResult<Vec<Film>> {
        let rows: Vec<EmbeddedFilm> = self
            .fetch_rows(self.client.get(self.url(kind.table())).query(&[
                ("account_id", Self::eq(account_id)),
                ("select", "films(*)".to_string()),
            ]))
            .await?;

        let mut seen = HashSet::new();
        Ok(rows
            .into_iter()
            .map(|row| row.films)
            .filter(|film| seen.insert(film.id))
            .collect())
    }
}
