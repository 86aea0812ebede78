//! Application state shared by all request handlers.

use std::sync::Arc;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::db::Database;
use crate::error::RepositoryError;
use crate::services::Services;

/// Cloning is cheap: services and the storage handle sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Storage handle, used directly by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Wires services to the repositories of an opened storage handle.
    pub fn new(database: Arc<Database>) -> Self {
        let services = Services::new(database.repositories());
        Self { services, database }
    }

    /// State over a fresh in-memory store.
    pub async fn memory() -> Result<Self, RepositoryError> {
        let config = DatabaseConfig {
            backend: DatabaseBackend::Memory,
            ..DatabaseConfig::default()
        };
        Ok(Self::new(Arc::new(Database::open(&config).await?)))
    }
}
