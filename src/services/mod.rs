//! Service layer: the driving ports and their implementations.
//!
//! Handlers depend on `UserUseCases` / `StoryUseCases`; the services depend
//! only on repository traits.

mod story_service;
mod user_service;

use std::sync::Arc;

pub use story_service::{StoryService, StoryUseCases};
pub use user_service::{UserService, UserUseCases};

use crate::repositories::Repositories;

/// Aggregates all use cases; cloning only bumps reference counts.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserUseCases>,
    pub stories: Arc<dyn StoryUseCases>,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        Self {
            users: Arc::new(UserService::new(repos.users)),
            stories: Arc::new(StoryService::new(repos.stories)),
        }
    }
}
