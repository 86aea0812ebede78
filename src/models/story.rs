use jiff::Timestamp;

use crate::error::{AppError, AppResult};

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 255;
pub const AUTHOR_MIN: usize = 3;
pub const AUTHOR_MAX: usize = 255;
pub const CONTENT_MIN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NewStory {
    pub title: String,
    pub author: String,
    pub content: String,
}

/// Any subset of the mutable story fields.
#[derive(Debug, Clone, Default)]
pub struct StoryChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
}

impl Story {
    pub fn new(id: String, input: NewStory, now: Timestamp) -> AppResult<Self> {
        validate_title(&input.title)?;
        validate_author(&input.author)?;
        validate_content(&input.content)?;
        Ok(Self {
            id,
            title: input.title,
            author: input.author,
            content: input.content,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validates all present fields first, then applies them and refreshes
    /// `updated_at`.
    pub fn apply(&mut self, changes: StoryChanges, now: Timestamp) -> AppResult<()> {
        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        if let Some(author) = &changes.author {
            validate_author(author)?;
        }
        if let Some(content) = &changes.content {
            validate_content(content)?;
        }

        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(author) = changes.author {
            self.author = author;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        self.updated_at = now.max(self.created_at);
        Ok(())
    }
}

fn check_length(
    field: &str,
    label: &str,
    value: &str,
    min: usize,
    max: Option<usize>,
) -> AppResult<()> {
    let len = value.chars().count();
    if len < min {
        return Err(AppError::validation(
            field,
            format!("{} must be at least {} characters", label, min),
        ));
    }
    match max {
        Some(max) if len > max => Err(AppError::validation(
            field,
            format!("{} must be at most {} characters", label, max),
        )),
        _ => Ok(()),
    }
}

fn validate_title(title: &str) -> AppResult<()> {
    check_length("title", "Title", title, TITLE_MIN, Some(TITLE_MAX))
}

fn validate_author(author: &str) -> AppResult<()> {
    check_length("author", "Author", author, AUTHOR_MIN, Some(AUTHOR_MAX))
}

fn validate_content(content: &str) -> AppResult<()> {
    check_length("content", "Content", content, CONTENT_MIN, None)
}
