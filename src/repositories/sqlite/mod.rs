//! SQLite repositories over a single shared connection.

mod schema;
mod story_repo;
pub mod timestamp;
mod user_repo;

pub use story_repo::SqliteStoryRepository;
pub use user_repo::SqliteUserRepository;
