use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::error::ConfigError;
use crate::error::RepositoryError;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

/// Application-wide error type returned by use cases and HTTP handlers.
///
/// Variants are matched structurally at the transport boundary; the
/// `Display` text is for logs and never drives control flow.
#[derive(Error, Debug)]
pub enum AppError {
    /// A single rule violated by caller input
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Several rule violations collected from a request body
    #[error("Validation failed: {}", join_field_errors(errors))]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// Request could not be decoded at all
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// No entity with the given id
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: String, id: String },

    /// Uniqueness rule violated
    #[error("Conflict: {entity}.{field} already exists")]
    Conflict { entity: String, field: String },

    /// Any lower-layer failure, with the operation that hit it
    #[error("Internal error: {context}")]
    Internal {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    /// Invalid or missing configuration at startup
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        AppError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn internal(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::Internal {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Translates a repository failure into the use-case taxonomy.
    ///
    /// Not-found and conflict keep their kind; everything else becomes
    /// `Internal` carrying `context` and the original error as its source.
    pub fn from_repository(context: impl Into<String>, error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { entity, id } => AppError::NotFound { entity, id },
            RepositoryError::Conflict { entity, field } => AppError::Conflict { entity, field },
            other => AppError::Internal {
                context: context.into(),
                source: anyhow::Error::from(other),
            },
        }
    }

    /// Field-level details suitable for a client-facing `details` string.
    pub fn details(&self) -> Option<String> {
        match self {
            AppError::Validation { field, reason } => Some(format!("{}: {}", field, reason)),
            AppError::ValidationErrors { errors } => Some(join_field_errors(errors)),
            _ => None,
        }
    }
}

fn join_field_errors(errors: &[ValidationFieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| ValidationFieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationErrors { errors: fields }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
        title: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn repository_not_found_keeps_its_kind() {
        let err = AppError::from_repository(
            "load user",
            RepositoryError::NotFound {
                entity: "user".to_string(),
                id: "abc".to_string(),
            },
        );
        assert!(matches!(err, AppError::NotFound { ref id, .. } if id == "abc"));
    }

    #[test]
    fn repository_conflict_keeps_its_kind() {
        let err = AppError::from_repository(
            "save user",
            RepositoryError::Conflict {
                entity: "users".to_string(),
                field: "email".to_string(),
            },
        );
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[test]
    fn other_repository_failures_become_internal_with_context() {
        let err = AppError::from_repository(
            "failed to save user 42",
            RepositoryError::Persistence {
                operation: "insert user".to_string(),
                source: anyhow::anyhow!("connection reset"),
            },
        );
        match err {
            AppError::Internal { context, source } => {
                assert_eq!(context, "failed to save user 42");
                assert!(format!("{:#}", source).contains("connection reset"));
            }
            other => panic!("Expected Internal, got {:?}", other),
        }
    }

    #[test]
    fn validator_errors_are_flattened_and_sorted() {
        let probe = Probe {
            title: "ab".to_string(),
            email: "nope".to_string(),
        };
        let err = AppError::from(probe.validate().unwrap_err());
        match &err {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "email");
                assert_eq!(errors[1].field, "title");
                assert_eq!(errors[1].message, "Title must be at least 3 characters");
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
        assert!(err.details().unwrap().contains("title: Title must be"));
    }

    #[test]
    fn details_only_for_validation_kinds() {
        assert!(AppError::not_found("story", "1").details().is_none());
        assert_eq!(
            AppError::validation("name", "Name is required").details(),
            Some("name: Name is required".to_string())
        );
    }
}
