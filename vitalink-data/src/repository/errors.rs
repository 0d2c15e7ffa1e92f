use std::sync::PoisonError;
use thiserror::Error;
use crate::database::DatabaseError;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict with an existing row (duplicate username, email or edge)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A deployment precondition does not hold (e.g. the demographic
    /// defaults singleton is missing or duplicated)
    #[error("Precondition violation: {0}")]
    Precondition(String),

    /// Mutex lock error
    #[error("Mutex lock error: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::MutexLock(error.to_string())
    }
}

/// Map a rusqlite error to the repository taxonomy, turning constraint
/// violations into `Conflict` so callers can treat duplicates as expected.
pub(crate) fn map_sqlite_error(error: rusqlite::Error, conflict_msg: &str) -> RepositoryError {
    match &error {
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            RepositoryError::Conflict(conflict_msg.to_string())
        }
        _ => RepositoryError::Sqlite(error),
    }
}
