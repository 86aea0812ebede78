use thiserror::Error;

/// Failures reported by storage adapters.
///
/// "No row matched" on update/delete is `NotFound`; a lookup that misses is
/// not an error at all and comes back as `Ok(None)`.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Update or delete matched zero rows
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation
    #[error("Duplicate entry: {entity}.{field} already exists")]
    Conflict { entity: String, field: String },

    /// Any other failure while talking to the store
    #[error("Database operation failed: {operation}")]
    Persistence {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// A stored timestamp that could not be decoded
    #[error("Stored timestamp '{value}' is not a valid RFC 3339 instant")]
    Format {
        value: String,
        #[source]
        source: jiff::Error,
    },

    /// Could not obtain a connection
    #[error("Connection pool error")]
    Pool {
        #[source]
        source: anyhow::Error,
    },
}

impl RepositoryError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        RepositoryError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for RepositoryError {
    fn from(error: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        RepositoryError::Pool {
            source: anyhow::Error::from(error),
        }
    }
}
