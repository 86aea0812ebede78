//! In-memory repositories.
//!
//! Same observable behavior as the SQL backends, including the unique
//! email rule and list ordering. Data lives as long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::RepositoryError;
use crate::models::{Story, User};
use crate::repositories::{RepositoryResult, StoryRepository, UserRepository};

#[derive(Default)]
pub struct MemoryUserRepository {
    rows: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        let mut rows = self.rows.write().await;
        if rows.values().any(|u| u.email == user.email) {
            return Err(email_conflict());
        }
        if rows.contains_key(&user.id) {
            return Err(RepositoryError::Conflict {
                entity: "users".to_string(),
                field: "id".to_string(),
            });
        }
        rows.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<User>> {
        let mut users: Vec<User> = self.rows.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn update(&self, user: &User) -> RepositoryResult<()> {
        let mut rows = self.rows.write().await;
        if rows
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(email_conflict());
        }
        let row = rows
            .get_mut(&user.id)
            .ok_or_else(|| RepositoryError::not_found("user", &user.id))?;
        row.email = user.email.clone();
        row.name = user.name.clone();
        row.updated_at = user.updated_at;
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.rows
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("user", id))
    }
}

fn email_conflict() -> RepositoryError {
    RepositoryError::Conflict {
        entity: "users".to_string(),
        field: "email".to_string(),
    }
}

#[derive(Default)]
pub struct MemoryStoryRepository {
    rows: RwLock<HashMap<String, Story>>,
}

#[async_trait]
impl StoryRepository for MemoryStoryRepository {
    async fn create(&self, story: &Story) -> RepositoryResult<()> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&story.id) {
            return Err(RepositoryError::Conflict {
                entity: "stories".to_string(),
                field: "id".to_string(),
            });
        }
        rows.insert(story.id.clone(), story.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Story>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Story>> {
        let mut stories: Vec<Story> = self.rows.read().await.values().cloned().collect();
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(stories)
    }

    async fn update(&self, story: &Story) -> RepositoryResult<()> {
        let mut rows = self.rows.write().await;
        let row = rows
            .get_mut(&story.id)
            .ok_or_else(|| RepositoryError::not_found("story", &story.id))?;
        row.title = story.title.clone();
        row.author = story.author.clone();
        row.content = story.content.clone();
        row.updated_at = story.updated_at;
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.rows
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("story", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{Timestamp, ToSpan};

    fn user(id: &str, email: &str, offset_secs: i64) -> User {
        let at = Timestamp::UNIX_EPOCH + offset_secs.seconds();
        User {
            id: id.to_string(),
            email: email.to_string(),
            name: "Someone".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    fn story(id: &str, offset_secs: i64) -> Story {
        let at = Timestamp::UNIX_EPOCH + offset_secs.seconds();
        Story {
            id: id.to_string(),
            title: "Title".to_string(),
            author: "Author".to_string(),
            content: "Long enough content".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let repo = MemoryUserRepository::default();
        repo.create(&user("a", "same@example.com", 0)).await.unwrap();
        let err = repo
            .create(&user("b", "same@example.com", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict { ref field, .. } if field == "email"));
    }

    #[tokio::test]
    async fn update_and_delete_missing_rows_are_not_found() {
        let repo = MemoryUserRepository::default();
        let ghost = user("ghost", "ghost@example.com", 0);
        assert!(matches!(
            repo.update(&ghost).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete("ghost").await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(repo.find_by_id("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn users_oldest_first_stories_newest_first() {
        let users = MemoryUserRepository::default();
        users.create(&user("late", "l@example.com", 10)).await.unwrap();
        users.create(&user("early", "e@example.com", 1)).await.unwrap();
        let ids: Vec<String> = users.find_all().await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["early", "late"]);

        let stories = MemoryStoryRepository::default();
        stories.create(&story("old", 1)).await.unwrap();
        stories.create(&story("new", 10)).await.unwrap();
        let ids: Vec<String> = stories.find_all().await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        assert!(MemoryStoryRepository::default().find_all().await.unwrap().is_empty());
    }
}
