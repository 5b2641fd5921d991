//! Database error types.

use derive_more::{Display, Error};
use diesel::result::DatabaseErrorKind;
use tracing::instrument;

/// Database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// Error message.
    pub message: String,
    /// True when the database refused the write on a constraint.
    pub constraint: bool,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            constraint: false,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates an error for a write the schema refused.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn constraint(message: impl Into<String>) -> Self {
        Self {
            constraint: true,
            ..Self::new(message)
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        match &err {
            diesel::result::Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::ForeignKeyViolation,
                info,
            ) => Self::constraint(info.message().to_string()),
            _ => Self::new(format!("Diesel error: {}", err)),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}
