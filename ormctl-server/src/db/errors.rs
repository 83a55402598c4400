//! Store error type shared by both session kinds

use ormctl_core::MappingError;

/// Database error type
///
/// Constraint violations on a primary key or UNIQUE index are lifted into
/// [`DbError::Conflict`] whichever driver reported them, so handlers can
/// answer 409 without knowing the session kind.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("row mapping failed: {0}")]
    Mapping(#[from] MappingError),

    #[error("session already committed or rolled back")]
    SessionClosed,

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl DbError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return Self::Conflict(db.message().to_owned());
            }
        }
        Self::Sqlx(e)
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, message) = &e {
            if matches!(
                code.extended_code,
                rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            ) {
                let message = message.clone().unwrap_or_else(|| code.to_string());
                return Self::Conflict(message);
            }
        }
        Self::Sqlite(e)
    }
}
