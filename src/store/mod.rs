//! Persistent storage for users, characters, planets and favorites.
//!
//! Handlers only see [`Store`]; the Postgres and in-memory backends are
//! interchangeable behind `Arc<dyn Store>`.

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStore;
pub use models::{
    Character, Favorite, NewCharacter, NewFavorite, NewPlanet, NewUser, Planet, User,
};
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint on the entity's natural key rejected the insert.
    #[error("{entity} already exists")]
    Duplicate { entity: &'static str },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    // users
    async fn insert_user(&self, new: NewUser) -> StoreResult<User>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;
    async fn find_user_by_mail(&self, mail: &str) -> StoreResult<Option<User>>;

    // characters
    async fn insert_character(&self, new: NewCharacter) -> StoreResult<Character>;
    async fn list_characters(&self) -> StoreResult<Vec<Character>>;
    async fn find_character(&self, id: i64) -> StoreResult<Option<Character>>;
    async fn find_matching_character(&self, new: &NewCharacter)
        -> StoreResult<Option<Character>>;

    // planets
    async fn insert_planet(&self, new: NewPlanet) -> StoreResult<Planet>;
    async fn list_planets(&self) -> StoreResult<Vec<Planet>>;
    async fn find_planet(&self, id: i64) -> StoreResult<Option<Planet>>;
    async fn find_matching_planet(&self, new: &NewPlanet) -> StoreResult<Option<Planet>>;

    // favorites
    async fn insert_favorite(&self, new: NewFavorite) -> StoreResult<Favorite>;
    async fn list_favorites_by_user(&self, user_id: i64) -> StoreResult<Vec<Favorite>>;
    async fn find_favorite(&self, id: i64) -> StoreResult<Option<Favorite>>;
    async fn find_matching_favorite(&self, new: &NewFavorite) -> StoreResult<Option<Favorite>>;
    /// Returns `false` when nothing was deleted.
    async fn delete_favorite(&self, id: i64) -> StoreResult<bool>;
}
