use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::schema::stories;
use super::timestamp;
use crate::db::SqliteHandle;
use crate::error::{DatabaseErrorConverter, RepositoryError};
use crate::models::Story;
use crate::repositories::{RepositoryResult, StoryRepository};

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = stories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct StoryRow {
    id: String,
    title: String,
    author: String,
    content: String,
    created_at: String,
    updated_at: String,
}

impl From<&Story> for StoryRow {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id.clone(),
            title: story.title.clone(),
            author: story.author.clone(),
            content: story.content.clone(),
            created_at: timestamp::encode(story.created_at),
            updated_at: timestamp::encode(story.updated_at),
        }
    }
}

impl TryFrom<StoryRow> for Story {
    type Error = RepositoryError;

    fn try_from(row: StoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at: timestamp::decode(&row.created_at)?,
            updated_at: timestamp::decode(&row.updated_at)?,
            id: row.id,
            title: row.title,
            author: row.author,
            content: row.content,
        })
    }
}

#[derive(Clone)]
pub struct SqliteStoryRepository {
    conn: SqliteHandle,
}

impl SqliteStoryRepository {
    pub fn new(conn: SqliteHandle) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl StoryRepository for SqliteStoryRepository {
    async fn create(&self, story: &Story) -> RepositoryResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(stories::table)
            .values(StoryRow::from(story))
            .execute(&mut *conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("insert story"))?;
        Ok(())
    }

    async fn find_by_id(&self, story_id: &str) -> RepositoryResult<Option<Story>> {
        let mut conn = self.conn.lock().await;

        stories::table
            .filter(stories::id.eq(story_id))
            .select(StoryRow::as_select())
            .first(&mut *conn)
            .await
            .optional()
            .map_err(DatabaseErrorConverter::for_operation("find story by id"))?
            .map(Story::try_from)
            .transpose()
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Story>> {
        let mut conn = self.conn.lock().await;

        stories::table
            .order((stories::created_at.desc(), stories::id.desc()))
            .select(StoryRow::as_select())
            .load(&mut *conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("list stories"))?
            .into_iter()
            .map(Story::try_from)
            .collect()
    }

    async fn update(&self, story: &Story) -> RepositoryResult<()> {
        let mut conn = self.conn.lock().await;

        let affected = diesel::update(stories::table.filter(stories::id.eq(&story.id)))
            .set((
                stories::title.eq(&story.title),
                stories::author.eq(&story.author),
                stories::content.eq(&story.content),
                stories::updated_at.eq(timestamp::encode(story.updated_at)),
            ))
            .execute(&mut *conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("update story"))?;

        if affected == 0 {
            return Err(RepositoryError::not_found("story", &story.id));
        }
        Ok(())
    }

    async fn delete(&self, story_id: &str) -> RepositoryResult<()> {
        let mut conn = self.conn.lock().await;

        let affected = diesel::delete(stories::table.filter(stories::id.eq(story_id)))
            .execute(&mut *conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("delete story"))?;

        if affected == 0 {
            return Err(RepositoryError::not_found("story", story_id));
        }
        Ok(())
    }
}
