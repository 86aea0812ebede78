//! Converts `AppError` into HTTP responses.
//!
//! Status codes follow the error variant. Internal causes are logged with
//! their source chain and replaced by a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::current_request_id;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl AppError {
    /// HTTP status for this error variant.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. }
            | AppError::ValidationErrors { .. }
            | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } | AppError::Configuration { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        match self {
            AppError::Validation { .. } | AppError::ValidationErrors { .. } => {
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(self.details())
            }
            AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
            AppError::NotFound { entity, id } => ErrorResponse::new(
                "NOT_FOUND",
                &format!("{} with id '{}' not found", entity, id),
            ),
            AppError::Conflict { entity, field } => ErrorResponse::new(
                "CONFLICT",
                &format!("A {} with this {} already exists", singular(entity), field),
            ),
            AppError::Internal { .. } | AppError::Configuration { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        }
    }
}

/// `users` -> `user`; entity names from constraint parsing are table names.
fn singular(entity: &str) -> &str {
    entity.strip_suffix('s').unwrap_or(entity)
}

/// `Display` of the error followed by each source, colon separated.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %error_chain(&self), "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = self
            .to_error_response()
            .with_request_id(current_request_id());
        (status, Json(body)).into_response()
    }
}
