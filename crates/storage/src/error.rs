use std::time::Duration;

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("{operation} failed for {context}: {source}")]
    Operation {
        operation: &'static str,
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    fn sqlx_source(&self) -> Option<&sqlx::Error> {
        match self {
            StorageError::Database(e) | StorageError::Operation { source: e, .. } => Some(e),
            _ => None,
        }
    }

    /// True when the provider itself could not be reached. These are surfaced
    /// as-is; nothing in this crate retries them.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self.sqlx_source(),
            Some(
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            )
        )
    }
}

/// Attaches the operation name and key identifiers to a failed statement.
///
/// Unique and foreign key violations are lifted to
/// [`StorageError::ConstraintViolation`] so callers can tell them apart from
/// plain query failures without inspecting driver codes.
pub trait QueryContext<T> {
    fn context(self, operation: &'static str, context: impl FnOnce() -> String) -> Result<T>;
}

impl<T> QueryContext<T> for std::result::Result<T, sqlx::Error> {
    fn context(self, operation: &'static str, context: impl FnOnce() -> String) -> Result<T> {
        self.map_err(|source| {
            if let sqlx::Error::Database(ref db_err) = source
                && matches!(
                    db_err.kind(),
                    ErrorKind::UniqueViolation | ErrorKind::ForeignKeyViolation
                )
            {
                return StorageError::ConstraintViolation(format!(
                    "{} for {}: {}",
                    operation,
                    context(),
                    db_err.message()
                ));
            }
            StorageError::Operation {
                operation,
                context: context(),
                source,
            }
        })
    }
}
