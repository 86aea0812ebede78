//! HTTP request handlers, one module per resource.

pub mod health;
pub mod stories;
pub mod users;

use crate::error::{AppError, AppResult};

/// Rejects blank path ids before they reach a use case.
pub(crate) fn require_id(id: &str) -> AppResult<&str> {
    if id.trim().is_empty() {
        return Err(AppError::validation("id", "ID must not be empty"));
    }
    Ok(id)
}

/// Target of `/api/users/` and `/api/stories/`, where the id segment is empty.
pub(crate) async fn empty_id() -> AppError {
    AppError::validation("id", "ID must not be empty")
}
