//! # Store Errors
//!
//! What can go wrong between a repository call and SQLite.
//!
//! ```text
//! sqlx::Error ──► DbError ──┬──► SyncError::DatabaseError   (OTA import)
//!                           └──► ApiError                    (front desk)
//! ```
//!
//! Repository calls are atomic: an `Err` means nothing was written.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No booking with that id, or no room with that number in the catalog.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A room number that is already in the catalog.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// The schema rejected the row (zero nights, negative rate, missing name).
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// The file could not be opened, or the pool was already closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// BEGIN or COMMIT of a multi-row write did not go through.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Every connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Fills in the offending value on a UniqueViolation raised by SQLite,
    /// which only reports the column.
    pub fn with_value(self, value: impl Into<String>) -> Self {
        match self {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: value.into(),
            },
            other => other,
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// SQLite only hands back a message, so constraint failures are told apart
/// by its prefix.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: rates.room_no"
                if let Some(field) = msg.split("UNIQUE constraint failed: ").nth(1) {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("CHECK constraint failed")
                    || msg.contains("NOT NULL constraint failed")
                {
                    DbError::ConstraintViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("store is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DbError::not_found("Booking", 7).to_string(),
            "Booking not found: 7"
        );
        assert_eq!(
            DbError::duplicate("rates.room_no", "unknown")
                .with_value("101")
                .to_string(),
            "Duplicate rates.room_no: '101' already exists"
        );
        assert!(DbError::not_found("Room", "999").is_not_found());
    }
}
