//! PostgreSQL repositories on a diesel-async bb8 pool.

mod schema;
mod story_repo;
mod user_repo;

pub use story_repo::PgStoryRepository;
pub use user_repo::PgUserRepository;
