//! Data Transfer Objects for API requests and responses.

mod error;
mod health;
mod story;
mod user;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use story::{CreateStoryRequest, StoryResponse, UpdateStoryRequest};
pub use user::{CreateUserRequest, UpdateUserRequest, UserResponse};
