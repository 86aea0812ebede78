use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff_diesel::ToDiesel;

use super::schema::users;
use crate::db::PgPool;
use crate::error::{DatabaseErrorConverter, RepositoryError};
use crate::models::User;
use crate::repositories::{RepositoryResult, UserRepository};

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct UserRow {
    id: String,
    email: String,
    name: String,
    created_at: jiff_diesel::Timestamp,
    updated_at: jiff_diesel::Timestamp,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at.to_diesel(),
            updated_at: user.updated_at.to_diesel(),
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        }
    }
}

/// User repository holding an async connection pool.
///
/// `PgPool` is reference counted internally, so cloning is cheap.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users::table)
            .values(UserRow::from(user))
            .execute(&mut conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("insert user"))?;
        Ok(())
    }

    async fn find_by_id(&self, user_id: &str) -> RepositoryResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        let row = users::table
            .filter(users::id.eq(user_id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(DatabaseErrorConverter::for_operation("find user by id"))?;
        Ok(row.map(User::from))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<User>> {
        let mut conn = self.pool.get().await?;

        let rows = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("list users"))?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update(&self, user: &User) -> RepositoryResult<()> {
        let mut conn = self.pool.get().await?;

        let affected = diesel::update(users::table.filter(users::id.eq(&user.id)))
            .set((
                users::email.eq(&user.email),
                users::name.eq(&user.name),
                users::updated_at.eq(user.updated_at.to_diesel()),
            ))
            .execute(&mut conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("update user"))?;

        if affected == 0 {
            return Err(RepositoryError::not_found("user", &user.id));
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> RepositoryResult<()> {
        let mut conn = self.pool.get().await?;

        let affected = diesel::delete(users::table.filter(users::id.eq(user_id)))
            .execute(&mut conn)
            .await
            .map_err(DatabaseErrorConverter::for_operation("delete user"))?;

        if affected == 0 {
            return Err(RepositoryError::not_found("user", user_id));
        }
        Ok(())
    }
}
