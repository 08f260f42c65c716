//! Errors raised by the storage layer.
//!
//! Two sources feed [`DbError`]: SQLite itself (constraint violations,
//! I/O, pool trouble) and business rules checked while a transaction is
//! open. The API layer turns both into an HTTP status through
//! [`DbError::category`].

use niaga_core::error::ErrorCategory;
use niaga_core::{CoreError, ValidationError};
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this id, e.g. an order deleted by another cashier.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write. `field` is `table.column`
    /// when SQLite reports it.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A row is still referenced (deleting a product that sits on an
    /// order line) or references something missing.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A rule checked inside a transaction: illegal transition, stale
    /// version, second open shift, not enough stock.
    #[error(transparent)]
    Rule(#[from] CoreError),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Category of the failure, `None` for infrastructure errors.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            DbError::NotFound { .. } => Some(ErrorCategory::NotFound),
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                Some(ErrorCategory::Conflict)
            }
            DbError::Rule(e) => Some(e.category()),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Rule(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        // "UNIQUE constraint failed: products.code"
                        field: message
                            .rsplit_once(": ")
                            .map(|(_, columns)| columns)
                            .unwrap_or("unknown")
                            .to_string(),
                        value: "unknown".to_string(),
                    },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                        message: message.to_string(),
                    },
                    _ => DbError::QueryFailed(message.to_string()),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
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
    fn test_rule_errors_keep_their_category() {
        let err = DbError::from(CoreError::InsufficientStock {
            code: "PRD000001".to_string(),
            available: 1,
            requested: 3,
        });
        assert_eq!(err.category(), Some(ErrorCategory::Conflict));
        assert_eq!(
            DbError::not_found("Produk", "p-1").category(),
            Some(ErrorCategory::NotFound)
        );
        assert_eq!(DbError::PoolExhausted.category(), None);
    }
}
