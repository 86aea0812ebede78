//! Repository layer: the storage contract and its backends.
//!
//! Services only ever see `Arc<dyn UserRepository>` / `Arc<dyn StoryRepository>`,
//! so PostgreSQL, SQLite and the in-memory store are interchangeable.

pub mod memory;
pub mod postgres;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RepositoryError;
use crate::models::{Story, User};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence contract for users.
///
/// Entities arrive with their final id and timestamps; implementations
/// never generate either.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new row. A duplicate email yields `RepositoryError::Conflict`.
    async fn create(&self, user: &User) -> RepositoryResult<()>;

    /// `Ok(None)` when no row has this id.
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>>;

    /// All users, oldest first.
    async fn find_all(&self) -> RepositoryResult<Vec<User>>;

    /// Overwrites email, name and `updated_at`. Zero rows matched is `NotFound`.
    async fn update(&self, user: &User) -> RepositoryResult<()>;

    /// Zero rows matched is `NotFound`.
    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

/// Persistence contract for stories.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    async fn create(&self, story: &Story) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Story>>;

    /// All stories, newest first.
    async fn find_all(&self) -> RepositoryResult<Vec<Story>>;

    async fn update(&self, story: &Story) -> RepositoryResult<()>;

    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

/// Aggregates all repositories for convenient access.
///
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub stories: Arc<dyn StoryRepository>,
}

impl Repositories {
    pub fn postgres(pool: crate::db::PgPool) -> Self {
        Self {
            users: Arc::new(postgres::PgUserRepository::new(pool.clone())),
            stories: Arc::new(postgres::PgStoryRepository::new(pool)),
        }
    }

    pub fn sqlite(handle: crate::db::SqliteHandle) -> Self {
        Self {
            users: Arc::new(sqlite::SqliteUserRepository::new(handle.clone())),
            stories: Arc::new(sqlite::SqliteStoryRepository::new(handle)),
        }
    }

    pub fn memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryUserRepository::default()),
            stories: Arc::new(memory::MemoryStoryRepository::default()),
        }
    }
}
