//! Configuration validation logic
//!
//! Each section validates itself; `Settings::validate` adds the rules that
//! span sections, such as the production auth-token requirement.

use crate::config::error::ConfigError;
use crate::config::settings::{DatabaseBackend, DatabaseConfig, ServerConfig, Settings};

const POSTGRES_SCHEMES: &[&str] = &["postgres://", "postgresql://"];

/// Remote endpoints that a local SQLite file connection cannot reach
const REMOTE_SCHEMES: &[&str] = &["libsql://", "http://", "https://", "ws://", "wss://"];

impl ServerConfig {
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    /// - CORS origins must be absolute http(s) origins or `*`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if let Some(origin) = self.cors_origins.iter().find(|o| {
            o.as_str() != "*" && !(o.starts_with("http://") || o.starts_with("https://"))
        }) {
            return Err(ConfigError::validation(
                "server.cors_origins",
                format!("Invalid CORS origin '{}'. Expected http(s)://host[:port] or '*'.", origin),
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// # Validation Rules
    /// - URL is required for the `postgres` and `sqlite` backends
    /// - `postgres` URLs must use the postgres:// or postgresql:// scheme
    /// - `sqlite` URLs must name a local file or `:memory:`
    /// - Pool sizes must be positive with min <= max
    /// - Connection timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.requires_url() && self.url.trim().is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                format!(
                    "Database URL is required for the '{}' backend. Set database.url or QUILL_DATABASE__URL.",
                    self.backend
                ),
            ));
        }

        match self.backend {
            DatabaseBackend::Postgres if !POSTGRES_SCHEMES.iter().any(|s| self.url.starts_with(s)) => {
                return Err(ConfigError::validation(
                    "database.url",
                    "Invalid PostgreSQL URL. Expected format: postgres://[user:password@]host[:port]/database",
                ));
            }
            DatabaseBackend::Sqlite if REMOTE_SCHEMES.iter().any(|s| self.url.starts_with(s)) => {
                return Err(ConfigError::validation(
                    "database.url",
                    "Remote SQLite endpoints are not supported. Use a file path, sqlite://path or :memory:",
                ));
            }
            _ => {}
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validates every section, then the cross-section rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.clone().into_logger_config()?;

        let token_missing = self
            .database
            .auth_token
            .as_deref()
            .is_none_or(|t| t.trim().is_empty());
        if self.application.environment.is_production()
            && self.database.backend == DatabaseBackend::Sqlite
            && token_missing
        {
            return Err(ConfigError::validation(
                "database.auth_token",
                "An auth token is required for the sqlite backend in production. Set QUILL_DATABASE__AUTH_TOKEN.",
            ));
        }

        Ok(())
    }
}
