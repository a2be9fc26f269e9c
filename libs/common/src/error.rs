//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Postgres SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Custom error type for database setup operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Error kind returned by the store traits.
///
/// Callers only ever branch on `NotFound` and `Conflict`; everything else is
/// an opaque failure that must not be shown to clients.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested record does not exist
    #[error("record not found")]
    NotFound,

    /// A unique constraint rejected the write
    #[error("record already exists")]
    Conflict,

    /// The store call did not finish before the request deadline
    #[error("store call timed out")]
    Timeout,

    /// Any other database failure
    #[error("database error: {0}")]
    Database(#[source] SqlxError),
}

impl From<SqlxError> for StoreError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => StoreError::NotFound,
            SqlxError::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::Conflict
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            StoreError::from(SqlxError::RowNotFound),
            StoreError::NotFound
        ));
    }

    #[test]
    fn database_errors_describe_their_cause() {
        let migration = DatabaseError::Migration("checksum mismatch".to_string());
        assert_eq!(
            migration.to_string(),
            "Database migration error: checksum mismatch"
        );

        let connection = DatabaseError::Connection(SqlxError::PoolTimedOut);
        assert!(connection.to_string().starts_with("Database connection error"));
    }

    #[test]
    fn other_errors_stay_opaque() {
        let err = StoreError::from(SqlxError::PoolTimedOut);
        assert!(matches!(err, StoreError::Database(_)));
        assert!(err.to_string().starts_with("database error"));
    }
}
