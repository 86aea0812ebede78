use crate::error::{ConstraintParser, RepositoryError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Converts Diesel errors into structured `RepositoryError` values.
///
/// Shared by both SQL backends; only unique violations get a dedicated
/// variant, everything else keeps the operation name and the original error.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error raised while performing `operation`.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> RepositoryError {
        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                match ConstraintParser::parse_unique_violation(
                    info.message(),
                    info.constraint_name(),
                ) {
                    Some((entity, field)) => RepositoryError::Conflict { entity, field },
                    None => RepositoryError::Persistence {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Unique constraint violation: {}",
                            info.message()
                        )),
                    },
                }
            }
            other => RepositoryError::Persistence {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    /// Returns a closure for `map_err` that tags errors with `operation`.
    pub fn for_operation(operation: &str) -> impl FnOnce(DieselError) -> RepositoryError + '_ {
        move |error| Self::convert_diesel_error(error, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDatabaseErrorInfo {
        message: String,
        constraint_name: Option<String>,
    }

    impl diesel::result::DatabaseErrorInformation for MockDatabaseErrorInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint_name.as_deref()
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, message: &str, constraint: Option<&str>) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(MockDatabaseErrorInfo {
                message: message.to_string(),
                constraint_name: constraint.map(str::to_string),
            }),
        )
    }

    #[test]
    fn unique_violation_becomes_conflict() {
        let error = db_error(
            DatabaseErrorKind::UniqueViolation,
            "duplicate key value violates unique constraint \"users_email_key\"",
            Some("users_email_key"),
        );
        match DatabaseErrorConverter::convert_diesel_error(error, "insert user") {
            RepositoryError::Conflict { entity, field } => {
                assert_eq!(entity, "users");
                assert_eq!(field, "email");
            }
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_unique_violation_stays_persistence() {
        let error = db_error(DatabaseErrorKind::UniqueViolation, "weird", None);
        assert!(matches!(
            DatabaseErrorConverter::convert_diesel_error(error, "insert user"),
            RepositoryError::Persistence { .. }
        ));
    }

    #[test]
    fn other_errors_keep_operation_name() {
        let error = db_error(DatabaseErrorKind::ForeignKeyViolation, "fk", None);
        match DatabaseErrorConverter::convert_diesel_error(error, "delete story") {
            RepositoryError::Persistence { operation, .. } => {
                assert_eq!(operation, "delete story")
            }
            other => panic!("Expected Persistence, got {:?}", other),
        }
    }

    #[test]
    fn for_operation_tags_errors() {
        let convert = DatabaseErrorConverter::for_operation("load stories");
        assert!(matches!(
            convert(DieselError::RollbackTransaction),
            RepositoryError::Persistence { ref operation, .. } if operation == "load stories"
        ));
    }
}
