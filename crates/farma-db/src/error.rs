//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//! sqlx::Error ──► DbError (this module) ──► StoreError (farma-caixa)
//!                                       ──► CaixaError ──► admin UI
//! ```
//!
//! The UNIQUE-violation case matters most: it is how the partial unique
//! index over open sessions turns a lost open race into a typed conflict
//! instead of a duplicate open session.

use thiserror::Error;

use farma_caixa::StoreError;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation, e.g. a second open session for a till.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Foreign key constraint violation, e.g. a movement referencing a
    /// session id that does not exist.
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed (missing file, permissions, disk full).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// All pool connections are in use.
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Anything else.
    #[error("internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// SQLite reports constraints only through error messages:
/// `UNIQUE constraint failed: <table>.<column>` and
/// `FOREIGN KEY constraint failed`.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if msg.contains("UNIQUE constraint failed") {
                    let constraint = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { constraint }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Projection into the store contract's error type.
impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { constraint } => StoreError::Conflict { constraint },
            DbError::ConnectionFailed(msg) => StoreError::Unavailable(msg),
            DbError::PoolExhausted => {
                StoreError::Unavailable("connection pool exhausted".to_string())
            }
            other => StoreError::Internal(other.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
