//! Process-wide storage handle.
//!
//! The configured backend is opened once at startup and shared by every
//! repository. Dropping the `Database` releases it.

pub mod migrations;

use std::sync::Arc;
use std::time::Duration;

use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tokio::sync::Mutex;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::error::{DatabaseErrorConverter, RepositoryError};
use crate::repositories::Repositories;

pub use migrations::{MigrationAction, MigrationError};

/// bb8 pool of async PostgreSQL connections; clones share the pool.
pub type PgPool = Pool<AsyncPgConnection>;

/// The single SQLite connection, serialized behind an async mutex.
pub type SqliteHandle = Arc<Mutex<SyncConnectionWrapper<diesel::SqliteConnection>>>;

pub enum Database {
    Postgres { pool: PgPool, url: String },
    Sqlite(SqliteHandle),
    Memory(Repositories),
}

impl Database {
    /// Opens the configured backend and verifies it answers.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let database = match config.backend {
            DatabaseBackend::Postgres => Database::Postgres {
                pool: Self::open_postgres(config).await?,
                url: config.url.clone(),
            },
            DatabaseBackend::Sqlite => Database::Sqlite(Self::open_sqlite(&config.url).await?),
            DatabaseBackend::Memory => Database::Memory(Repositories::memory()),
        };
        database.ping().await?;

        tracing::info!(backend = %database.backend(), "Storage handle opened");
        Ok(database)
    }

    async fn open_postgres(config: &DatabaseConfig) -> Result<PgPool, RepositoryError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);
        Pool::builder()
            .max_size(config.max_connections)
            .min_idle(Some(config.min_connections))
            .connection_timeout(Duration::from_secs(config.connection_timeout))
            .build(manager)
            .await
            .map_err(|e| RepositoryError::Pool {
                source: anyhow::Error::from(e),
            })
    }

    async fn open_sqlite(url: &str) -> Result<SqliteHandle, RepositoryError> {
        let path = sqlite_path(url);
        let conn = SyncConnectionWrapper::<diesel::SqliteConnection>::establish(path)
            .await
            .map_err(|e| RepositoryError::Pool {
                source: anyhow::Error::from(e).context(format!("open sqlite database '{}'", path)),
            })?;
        Ok(Arc::new(Mutex::new(conn)))
    }

    pub fn backend(&self) -> DatabaseBackend {
        match self {
            Database::Postgres { .. } => DatabaseBackend::Postgres,
            Database::Sqlite(_) => DatabaseBackend::Sqlite,
            Database::Memory(_) => DatabaseBackend::Memory,
        }
    }

    /// Repositories bound to this handle.
    pub fn repositories(&self) -> Repositories {
        match self {
            Database::Postgres { pool, .. } => Repositories::postgres(pool.clone()),
            Database::Sqlite(handle) => Repositories::sqlite(handle.clone()),
            Database::Memory(repos) => repos.clone(),
        }
    }

    /// Round-trips a trivial query.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        let ping = diesel::sql_query("SELECT 1");
        match self {
            Database::Postgres { pool, .. } => {
                let mut conn = pool.get().await?;
                ping.execute(&mut conn)
                    .await
                    .map_err(DatabaseErrorConverter::for_operation("ping"))?;
            }
            Database::Sqlite(handle) => {
                let mut conn = handle.lock().await;
                ping.execute(&mut *conn)
                    .await
                    .map_err(DatabaseErrorConverter::for_operation("ping"))?;
            }
            Database::Memory(_) => {}
        }
        Ok(())
    }

    /// Runs a migration action against this backend.
    pub async fn migrate(&self, action: MigrationAction) -> Result<Vec<String>, MigrationError> {
        match self {
            Database::Postgres { url, .. } => {
                let url = url.clone();
                tokio::task::spawn_blocking(move || {
                    use diesel::Connection;
                    let mut conn = diesel::PgConnection::establish(&url).map_err(|e| {
                        MigrationError::Harness {
                            operation: "establish connection for migrations",
                            message: e.to_string(),
                        }
                    })?;
                    migrations::apply::<diesel::pg::Pg, _>(&mut conn, migrations::postgres, action)
                })
                .await
                .map_err(|e| MigrationError::Harness {
                    operation: "join migration task",
                    message: e.to_string(),
                })?
            }
            Database::Sqlite(handle) => {
                let mut conn = handle.lock().await;
                conn.spawn_blocking(move |c| {
                    Ok(migrations::apply::<diesel::sqlite::Sqlite, _>(
                        c,
                        migrations::sqlite,
                        action,
                    ))
                })
                .await
                .map_err(|e| MigrationError::Harness {
                    operation: "run migrations on sqlite connection",
                    message: e.to_string(),
                })?
            }
            Database::Memory(_) => Err(MigrationError::Unsupported("memory")),
        }
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        tracing::info!(backend = %self.backend(), "Storage handle released");
    }
}

/// Strips an optional `sqlite://` or `sqlite:` scheme from the configured URL.
fn sqlite_path(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            backend: DatabaseBackend::Sqlite,
            url: url.to_string(),
            ..DatabaseConfig::default()
        }
    }

    #[test]
    fn sqlite_path_strips_scheme() {
        assert_eq!(sqlite_path("sqlite://data/quill.db"), "data/quill.db");
        assert_eq!(sqlite_path("sqlite::memory:"), ":memory:");
        assert_eq!(sqlite_path("quill.db"), "quill.db");
    }

    #[tokio::test]
    async fn opens_in_memory_sqlite_and_migrates() {
        let db = Database::open(&sqlite_config(":memory:")).await.unwrap();
        assert_eq!(db.backend(), DatabaseBackend::Sqlite);

        let applied = db.migrate(MigrationAction::Run).await.unwrap();
        assert!(!applied.is_empty());
        assert!(db.migrate(MigrationAction::Pending).await.unwrap().is_empty());
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn sqlite_file_is_created_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.db");
        let url = format!("sqlite://{}", path.display());
        let db = Database::open(&sqlite_config(&url)).await.unwrap();
        drop(db);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn memory_backend_has_no_migrations() {
        let config = DatabaseConfig {
            backend: DatabaseBackend::Memory,
            ..DatabaseConfig::default()
        };
        let db = Database::open(&config).await.unwrap();
        assert!(matches!(
            db.migrate(MigrationAction::Run).await,
            Err(MigrationError::Unsupported("memory"))
        ));
        assert!(db.repositories().users.find_all().await.unwrap().is_empty());
    }
}
