//! Embedded schema migrations for both SQL backends.

use diesel::backend::Backend;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;

pub const POSTGRES_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");
pub const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");

/// What to do with the migration set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationAction {
    /// List pending migrations without applying them
    Pending,
    /// Apply everything pending
    Run,
    /// Revert the given number of most recent migrations
    Revert(u32),
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Cannot roll back {requested} migration(s): only {applied} applied")]
    NotEnoughApplied { requested: u32, applied: usize },

    #[error("Failed to {operation}: {message}")]
    Harness {
        operation: &'static str,
        message: String,
    },

    #[error("Migrations are not supported by the '{0}' backend")]
    Unsupported(&'static str),
}

impl MigrationError {
    fn harness(operation: &'static str, error: impl std::fmt::Display) -> Self {
        MigrationError::Harness {
            operation,
            message: error.to_string(),
        }
    }
}

/// Runs `action` on a synchronous connection.
///
/// Returns migration names (pending, applied or reverted, depending on the action).
pub(crate) fn apply<DB, C>(
    conn: &mut C,
    migrations: fn() -> EmbeddedMigrations,
    action: MigrationAction,
) -> Result<Vec<String>, MigrationError>
where
    DB: Backend,
    C: MigrationHarness<DB>,
{
    match action {
        MigrationAction::Pending => Ok(conn
            .pending_migrations(migrations())
            .map_err(|e| MigrationError::harness("check pending migrations", e))?
            .iter()
            .map(|m| m.name().to_string())
            .collect()),
        MigrationAction::Run => Ok(conn
            .run_pending_migrations(migrations())
            .map_err(|e| MigrationError::harness("run pending migrations", e))?
            .iter()
            .map(|v| v.to_string())
            .collect()),
        MigrationAction::Revert(steps) => {
            let applied = conn
                .applied_migrations()
                .map_err(|e| MigrationError::harness("list applied migrations", e))?
                .len();
            if applied < steps as usize {
                return Err(MigrationError::NotEnoughApplied {
                    requested: steps,
                    applied,
                });
            }

            let mut reverted = Vec::with_capacity(steps as usize);
            for _ in 0..steps {
                let version = conn
                    .revert_last_migration(migrations())
                    .map_err(|e| MigrationError::harness("revert migration", e))?;
                reverted.push(version.to_string());
            }
            Ok(reverted)
        }
    }
}

pub(crate) fn postgres() -> EmbeddedMigrations {
    POSTGRES_MIGRATIONS
}

pub(crate) fn sqlite() -> EmbeddedMigrations {
    SQLITE_MIGRATIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::Connection;
    use diesel::sqlite::{Sqlite, SqliteConnection};

    #[test]
    fn sqlite_migrations_apply_and_revert() {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();

        let pending = apply::<Sqlite, _>(&mut conn, sqlite, MigrationAction::Pending).unwrap();
        assert!(!pending.is_empty());

        let applied = apply::<Sqlite, _>(&mut conn, sqlite, MigrationAction::Run).unwrap();
        assert_eq!(applied.len(), pending.len());
        assert!(apply::<Sqlite, _>(&mut conn, sqlite, MigrationAction::Pending).unwrap().is_empty());

        let reverted = apply::<Sqlite, _>(&mut conn, sqlite, MigrationAction::Revert(1)).unwrap();
        assert_eq!(reverted.len(), 1);
    }

    #[test]
    fn revert_more_than_applied_is_rejected() {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        match apply::<Sqlite, _>(&mut conn, sqlite, MigrationAction::Revert(3)) {
            Err(MigrationError::NotEnoughApplied { requested, applied }) => {
                assert_eq!(requested, 3);
                assert_eq!(applied, 0);
            }
            other => panic!("Expected NotEnoughApplied, got {:?}", other),
        }
    }
}
