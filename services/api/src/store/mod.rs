//! Storage interface and drivers
//!
//! One trait, two drivers: [`postgres::PostgresStore`] talks to the
//! relational database directly through sqlx, [`rest::RestStore`] talks to a
//! managed PostgREST-style backend over HTTP. The driver is selected at
//! startup by configuration; handlers only ever see `Arc<dyn Store>`.

pub mod postgres;
pub mod rest;

use async_trait::async_trait;
use common::error::StoreResult;
use uuid::Uuid;

use crate::models::{Account, CrewMember, Film, NewAccount, NewFilm};

/// Which per-account interaction table an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Like,
    Save,
}

impl InteractionKind {
    /// Backing table name
    pub fn table(self) -> &'static str {
        match self {
            InteractionKind::Like => "likes",
            InteractionKind::Save => "saves",
        }
    }

    /// Name of the SQL function the managed-backend driver calls for an
    /// atomic toggle
    pub fn toggle_rpc(self) -> &'static str {
        match self {
            InteractionKind::Like => "toggle_like",
            InteractionKind::Save => "toggle_save",
        }
    }
}

/// Storage interface implemented by both drivers
///
/// Toggle operations are required to be atomic against the backing store:
/// a single statement (or a single server-side function call), never a
/// separate existence check followed by a write.
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist a new account. Fails with a conflict when the email is taken.
    async fn create_account(&self, new: &NewAccount) -> StoreResult<Account>;

    /// Look up an account by email.
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// All films, unordered.
    async fn list_films(&self) -> StoreResult<Vec<Film>>;

    /// A single film by id, `None` when it does not exist.
    async fn get_film(&self, film_id: Uuid) -> StoreResult<Option<Film>>;

    /// Crew attached to a film.
    async fn crew_for_film(&self, film_id: Uuid) -> StoreResult<Vec<CrewMember>>;

    /// Films created within the window, most-liked first, ties by recency.
    async fn trending_films(&self, window_days: u32, limit: i64) -> StoreResult<Vec<Film>>;

    /// Most recently created films.
    async fn latest_films(&self, limit: i64) -> StoreResult<Vec<Film>>;

    /// Insert a film together with its crew as one atomic unit.
    async fn create_film(&self, new: &NewFilm) -> StoreResult<Film>;

    /// Whether the (account, film) interaction row exists.
    async fn interaction_exists(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<bool>;

    /// Atomically flip the interaction row and return the new state
    /// (`true` when the row now exists).
    async fn toggle_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<bool>;

    /// Idempotently create the interaction row.
    async fn add_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<()>;

    /// Idempotently delete the interaction row.
    async fn remove_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
        film_id: Uuid,
    ) -> StoreResult<()>;

    /// Films the account has liked/saved, deduplicated by film id.
    async fn films_for_interaction(
        &self,
        kind: InteractionKind,
        account_id: Uuid,
    ) -> StoreResult<Vec<Film>>;
}
