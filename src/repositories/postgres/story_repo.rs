use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::ToDiesel;

use super::schema::stories;
use crate::db::PgPool;
use crate::error::{DatabaseErrorConverter, RepositoryError};
use crate::models::Story;
use crate::repositories::{RepositoryResult, StoryRepository};

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = stories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct StoryRow {
    id: String,
    title: String,
    author: String,
    content: String,
    created_at: jiff_diesel::Timestamp,
    updated_at: jiff_diesel::Timestamp,
}

impl From<&Story> for StoryRow {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id.clone(),
            title: story.title.clone(),
            author: story.author.clone(),
            content: story.content.clone(),
            created_at: story.created_at.to_diesel(),
            updated_at: story.updated_at.to_diesel(),
        }
    }
}

impl From<StoryRow> for Story {
    fn from(row: StoryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            content: row.content,
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        }
    }
}

#[derive(Clone)]
pub struct PgStoryRepository {
    pool: PgPool,
}

impl PgStoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoryRepository for PgStoryRepository {
    async fn create(&self, story: &Story) -> RepositoryResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(stories::table)
            .values(StoryRow::from(story))
            .execute(&mut conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("insert story"))?;
        Ok(())
    }

    async fn find_by_id(&self, story_id: &str) -> RepositoryResult<Option<Story>> {
        let mut conn = self.pool.get().await?;

        let row = stories::table
            .filter(stories::id.eq(story_id))
            .select(StoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(DatabaseErrorConverter::for_operation("find story by id"))?;
        Ok(row.map(Story::from))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Story>> {
        let mut conn = self.pool.get().await?;

        let rows = stories::table
            .order((stories::created_at.desc(), stories::id.desc()))
            .select(StoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("list stories"))?;
        Ok(rows.into_iter().map(Story::from).collect())
    }

    async fn update(&self, story: &Story) -> RepositoryResult<()> {
        let mut conn = self.pool.get().await?;

        let affected = diesel::update(stories::table.filter(stories::id.eq(&story.id)))
            .set((
                stories::title.eq(&story.title),
                stories::author.eq(&story.author),
                stories::content.eq(&story.content),
                stories::updated_at.eq(story.updated_at.to_diesel()),
            ))
            .execute(&mut conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("update story"))?;

        if affected == 0 {
            return Err(RepositoryError::not_found("story", &story.id));
        }
        Ok(())
    }

    async fn delete(&self, story_id: &str) -> RepositoryResult<()> {
        let mut conn = self.pool.get().await?;

        let affected = diesel::delete(stories::table.filter(stories::id.eq(story_id)))
            .execute(&mut conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("delete story"))?;

        if affected == 0 {
            return Err(RepositoryError::not_found("story", story_id));
        }
        Ok(())
    }
}
