use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::schema::users;
use super::timestamp;
use crate::db::SqliteHandle;
use crate::error::{DatabaseErrorConverter, RepositoryError};
use crate::models::User;
use crate::repositories::{RepositoryResult, UserRepository};

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserRow {
    id: String,
    email: String,
    name: String,
    created_at: String,
    updated_at: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: timestamp::encode(user.created_at),
            updated_at: timestamp::encode(user.updated_at),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at: timestamp::decode(&row.created_at)?,
            updated_at: timestamp::decode(&row.updated_at)?,
            id: row.id,
            email: row.email,
            name: row.name,
        })
    }
}

/// User repository sharing the process-wide SQLite connection.
#[derive(Clone)]
pub struct SqliteUserRepository {
    conn: SqliteHandle,
}

impl SqliteUserRepository {
    pub fn new(conn: SqliteHandle) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(users::table)
            .values(UserRow::from(user))
            .execute(&mut *conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("insert user"))?;
        Ok(())
    }

    async fn find_by_id(&self, user_id: &str) -> RepositoryResult<Option<User>> {
        let mut conn = self.conn.lock().await;

        users::table
            .filter(users::id.eq(user_id))
            .select(UserRow::as_select())
            .first(&mut *conn)
            .await
            .optional()
            .map_err(DatabaseErrorConverter::for_operation("find user by id"))?
            .map(User::try_from)
            .transpose()
    }

    async fn find_all(&self) -> RepositoryResult<Vec<User>> {
        let mut conn = self.conn.lock().await;

        users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut *conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("list users"))?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn update(&self, user: &User) -> RepositoryResult<()> {
        let mut conn = self.conn.lock().await;

        let affected = diesel::update(users::table.filter(users::id.eq(&user.id)))
            .set((
                users::email.eq(&user.email),
                users::name.eq(&user.name),
                users::updated_at.eq(timestamp::encode(user.updated_at)),
            ))
            .execute(&mut *conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("update user"))?;

        if affected == 0 {
            return Err(RepositoryError::not_found("user", &user.id));
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> RepositoryResult<()> {
        let mut conn = self.conn.lock().await;

        let affected = diesel::delete(users::table.filter(users::id.eq(user_id)))
            .execute(&mut *conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("delete user"))?;

        if affected == 0 {
            return Err(RepositoryError::not_found("user", user_id));
        }
        Ok(())
    }
}
