//! Relational storage driver backed by sqlx/PostgreSQL

use async_trait::async_trait;
use common::error::StoreResult;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use crate::models::{Account, CrewMember, Film, NewAccount, NewFilm};
use crate::store::{InteractionKind, Store};

/// Storage driver over a shared PostgreSQL connection pool
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new driver over the shared pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn account_from_row(row: &PgRow) -> Account {
    Account {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

fn film_from_row(row: &PgRow) -> Film {
    Film {
        id: row.get("id"),
        account_id: row.get("account_id"),
        film_url: row.get("film_url"),
        thumbnail_url: row.get("thumbnail_url"),
        title: row.get("title"),
        description: row.get("description"),
        genre: row.get("genre"),
        created_at: row.get("created_at"),
    }
}

fn crew_from_row(row: &PgRow) -> CrewMember {
    CrewMember {
        id: row.get("id"),
        film_id: row.get("film_id"),
        role: row.get("role"),
        name: row.get("name"),
        email: row.get("email"),
    }
}

const FILM_COLUMNS: &str =
    "id, account_id, film_url, thumbnail_url, title, description, genre, created_at";

#[async_trait]
impl Store for PostgresStore {
    async fn create_account(&self, new: &NewAccount) -> StoreResult<Account> {
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(account_from_row(&row))
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(account_from_row))
    }

    async fn list_films(&self) -> StoreResult<Vec<Film>> {
        let rows = sqlx::query(&format!("SELECT {FILM_COLUMNS} FROM films"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(film_from_row).collect())
    }

    async fn get_film(&self, film_id: Uuid) -> StoreResult<Option<Film>> {
        let row = sqlx::query(&format!(
            "SELECT {FILM_COLUMNS} FROM films WHERE id = $1"
        ))
        .bind(film_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(film_from_row))
    }

    async fn crew_for_film(&self, film_id: Uuid) -> StoreResult<Vec<CrewMember>> {
        let rows = sqlx::query(
            r#"
            SELECT id, film_id, role, name, email
            FROM crew
            WHERE film_id = $1
            "#,
        )
        .bind(film_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(crew_from_row).collect())
    }

    async fn trending_films(&self, window_days: u32, limit: i64) -> StoreResult<Vec<Film>> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.account_id, f.film_url, f.thumbnail_url,
                   f.title, f.description, f.genre, f.created_at
            FROM films f
            LEFT JOIN likes l ON l.film_id = f.id
            WHERE f.created_at >= now() - make_interval(days => $1)
            GROUP BY f.id
            ORDER BY COUNT(l.id) DESC, f.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(window_days as i32)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(film_from_row).collect())
    }

    async fn latest_films(&self, limit: i64) -> StoreResult<Vec<Film>> {
        let rows = sqlx::query(&format!(
            "SELECT {FILM_COLUMNS} FROM films ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(film_from_row).collect())
    }

    async fn create_film(&self, new: &NewFilm) -> StoreResult<Film> {
        // Film and crew commit or roll back together.
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO films (account_id, film_url, thumbnail_url, title, description, genre)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, account_id, film_url, thumbnail_url, title, description, genre, created_at
            "#,
        )
        .bind(new.account_id)
        .bind(&new.film_url)
        .bind(&new.thumbnail_url)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.genre)
        .fetch_one(&mut *tx)
        .await?;

        let film = film_from_row(&row);

        for member in &new.crew {
            sqlx::query(
                r#"
                INSERT INTO crew (film_id, role, name, email)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(film.id)
            .bind(&member.role)
            .bind(&member.name)
            .bind(&member.email)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(film_id = %film.id, crew = new.crew.len(), "film created");
        Ok(film)
    }

    async fn interaction_exists(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<bool> {
        let row = sqlx::query(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE account_id = $1 AND film_id = $2) AS present",
            kind.table()
        ))
        .bind(account_id)
        .bind(film_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("present"))
    }

    async fn toggle_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<bool> {
        // Single-statement toggle: delete if present, otherwise insert. The
        // unique constraint plus ON CONFLICT DO NOTHING keeps concurrent
        // toggles from ever producing duplicate rows.
        let row = sqlx::query(&format!(
            r#"
            WITH removed AS (
                DELETE FROM {table}
                WHERE account_id = $1 AND film_id = $2
                RETURNING id
            ), added AS (
                INSERT INTO {table} (account_id, film_id)
                SELECT $1, $2
                WHERE NOT EXISTS (SELECT 1 FROM removed)
                ON CONFLICT (account_id, film_id) DO NOTHING
                RETURNING id
            )
            SELECT EXISTS (SELECT 1 FROM added) AS present
            "#,
            table = kind.table()
        ))
        .bind(account_id)
        .bind(film_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("present"))
    }

    async fn add_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO {} (account_id, film_id) VALUES ($1, $2) \
             ON CONFLICT (account_id, film_id) DO NOTHING",
            kind.table()
        ))
        .bind(account_id)
        .bind(film_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<()> {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE account_id = $1 AND film_id = $2",
            kind.table()
        ))
        .bind(account_id)
        .bind(film_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn films_for_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
    ) -> StoreResult<Vec<Film>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT DISTINCT ON (f.id)
                   f.id, f.account_id, f.film_url, f.thumbnail_url,
                   f.title, f.description, f.genre, f.created_at
            FROM {} i
            JOIN films f ON f.id = i.film_id
            WHERE i.account_id = $1
            ORDER BY f.id, i.created_at DESC
            "#,
            kind.table()
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(film_from_row).collect())
    }
}
