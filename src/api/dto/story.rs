//! Story DTOs.

use crate::models::{NewStory, Story, StoryChanges};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateStoryRequest {
    #[validate(length(min = 3, max = 255, message = "Title must be between 3 and 255 characters"))]
    #[schema(min_length = 3, max_length = 255)]
    pub title: String,
    #[validate(length(min = 3, max = 255, message = "Author must be between 3 and 255 characters"))]
    #[schema(min_length = 3, max_length = 255)]
    pub author: String,
    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    #[schema(min_length = 10)]
    pub content: String,
}

impl From<CreateStoryRequest> for NewStory {
    fn from(request: CreateStoryRequest) -> Self {
        NewStory {
            title: request.title,
            author: request.author,
            content: request.content,
        }
    }
}

/// Omitted or `null` fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateStoryRequest {
    #[validate(length(min = 3, max = 255, message = "Title must be between 3 and 255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 3, max = 255, message = "Author must be between 3 and 255 characters"))]
    pub author: Option<String>,
    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    pub content: Option<String>,
}

impl From<UpdateStoryRequest> for StoryChanges {
    fn from(request: UpdateStoryRequest) -> Self {
        StoryChanges {
            title: request.title,
            author: request.author,
            content: request.content,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoryResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

impl From<Story> for StoryResponse {
    fn from(story: Story) -> Self {
        Self {
            id: story.id,
            title: story.title,
            author: story.author,
            content: story.content,
            created_at: story.created_at,
            updated_at: story.updated_at,
        }
    }
}
