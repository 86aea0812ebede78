//! Story use cases.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewStory, Story, StoryChanges};
use crate::repositories::StoryRepository;
use crate::utils::time;

/// Driving port for story operations.
#[async_trait]
pub trait StoryUseCases: Send + Sync {
    async fn create_story(&self, input: NewStory) -> AppResult<Story>;
    async fn get_story(&self, id: &str) -> AppResult<Story>;
    /// Newest first
    async fn list_stories(&self) -> AppResult<Vec<Story>>;
    async fn update_story(&self, id: &str, changes: StoryChanges) -> AppResult<Story>;
    async fn delete_story(&self, id: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct StoryService {
    repo: Arc<dyn StoryRepository>,
}

impl StoryService {
    pub fn new(repo: Arc<dyn StoryRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl StoryUseCases for StoryService {
    async fn create_story(&self, input: NewStory) -> AppResult<Story> {
        let story = Story::new(Uuid::new_v4().to_string(), input, time::now())?;

        self.repo.create(&story).await.map_err(|e| {
            AppError::from_repository(format!("failed to save story {}", story.id), e)
        })?;

        tracing::info!(story_id = %story.id, "Story created");
        Ok(story)
    }

    async fn get_story(&self, id: &str) -> AppResult<Story> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| AppError::from_repository(format!("failed to load story {}", id), e))?
            .ok_or_else(|| AppError::not_found("story", id))
    }

    async fn list_stories(&self) -> AppResult<Vec<Story>> {
        self.repo
            .find_all()
            .await
            .map_err(|e| AppError::from_repository("failed to list stories", e))
    }

    async fn update_story(&self, id: &str, changes: StoryChanges) -> AppResult<Story> {
        let mut story = self.get_story(id).await?;
        story.apply(changes, time::now())?;

        self.repo
            .update(&story)
            .await
            .map_err(|e| AppError::from_repository(format!("failed to update story {}", id), e))?;

        tracing::info!(story_id = %id, "Story updated");
        Ok(story)
    }

    async fn delete_story(&self, id: &str) -> AppResult<()> {
        self.repo
            .delete(id)
            .await
            .map_err(|e| AppError::from_repository(format!("failed to delete story {}", id), e))?;

        tracing::info!(story_id = %id, "Story deleted");
        Ok(())
    }
}
