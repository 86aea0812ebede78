//! Migrate command handler

use crate::config::Settings;
use crate::db::{Database, MigrationAction, MigrationError};
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Lists pending migrations (`dry_run`), reverts `rollback` steps, or
    /// applies everything pending. Returns the affected migration names.
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<Vec<String>> {
        self.config.database.validate()?;

        let action = match (dry_run, rollback) {
            (true, _) => MigrationAction::Pending,
            (false, Some(steps)) => MigrationAction::Revert(steps),
            (false, None) => MigrationAction::Run,
        };

        let database = Database::open(&self.config.database)
            .await
            .map_err(|e| AppError::from_repository("open storage for migrations", e))?;
        let names = database.migrate(action).await.map_err(migration_error)?;

        report(action, &names);
        Ok(names)
    }
}

fn migration_error(error: MigrationError) -> AppError {
    match error {
        MigrationError::NotEnoughApplied { .. } => {
            AppError::validation("rollback_steps", error.to_string())
        }
        MigrationError::Unsupported(_) => AppError::validation("database.backend", error.to_string()),
        MigrationError::Harness { .. } => AppError::internal("migrate database", error),
    }
}

fn report(action: MigrationAction, names: &[String]) {
    let verb = match action {
        MigrationAction::Pending => "Pending",
        MigrationAction::Run => "Applied",
        MigrationAction::Revert(_) => "Reverted",
    };

    if names.is_empty() {
        println!("✓ Nothing to do - database is up to date");
        return;
    }

    println!("{} {} migration(s):", verb, names.len());
    for name in names {
        println!("  - {}", name);
        tracing::info!(migration = %name, action = verb, "Migration");
    }
}
