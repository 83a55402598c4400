//! Database layer - sessions, repositories and pools
//!
//! # Design Principles
//!
//! - One session per request; a session owns one transaction
//! - Async and blocking sessions satisfy the same [`Session`] contract
//! - All list operations use JOINs - no N+1 queries
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod errors;
pub mod pool;
pub mod repos;
pub mod schema;
pub mod session;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use errors::DbError;
pub use repos::{ItemRepository, RequestRepository, RequestTrainingRepository, TrainingRepository};
pub use schema::Schema;
pub use session::{AsyncDatabase, AsyncSession, BlockingDatabase, BlockingSession};

/// How sessions talk to SQLite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// sqlx; every query suspends the task at I/O
    #[default]
    Async,
    /// rusqlite behind r2d2; every query blocks its worker thread
    Blocking,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Async => "async",
            SessionMode::Blocking => "blocking",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "async" => Ok(SessionMode::Async),
            "blocking" | "sync" => Ok(SessionMode::Blocking),
            other => Err(format!("unknown session mode '{other}' (expected async or blocking)")),
        }
    }
}

/// Handle that hands out sessions
#[async_trait]
pub trait Database: Send + Sync {
    fn mode(&self) -> SessionMode;

    /// Open a session that may write. The write lock is taken up front
    /// (`BEGIN IMMEDIATE`), so concurrent writers queue on the busy timeout
    /// instead of failing when their read snapshot goes stale.
    async fn begin(&self) -> Result<Box<dyn Session>, DbError>;

    /// Open a read-only session (deferred `BEGIN`); never blocks writers.
    async fn begin_read(&self) -> Result<Box<dyn Session>, DbError>;
}

/// Unit of work over one connection.
///
/// Everything done through the repository methods becomes visible to other
/// sessions only after [`Session::commit`]. Dropping a session that was not
/// committed rolls it back and returns the connection to its pool. Any call
/// after commit or rollback fails with [`DbError::SessionClosed`].
#[async_trait]
pub trait Session:
    ItemRepository + RequestRepository + TrainingRepository + RequestTrainingRepository + Send
{
    async fn commit(&mut self) -> Result<(), DbError>;

    async fn rollback(&mut self) -> Result<(), DbError>;
}

/// Open the database file at `path` in the given mode, creating `schema`.
pub async fn open(
    mode: SessionMode,
    schema: Schema,
    path: &Path,
    max_connections: u32,
) -> Result<Arc<dyn Database>, DbError> {
    tracing::info!(%mode, %schema, path = %path.display(), "opening database");

    let db: Arc<dyn Database> = match mode {
        SessionMode::Async => Arc::new(AsyncDatabase::open(schema, path, max_connections).await?),
        SessionMode::Blocking => {
            let path = path.to_path_buf();
            let db = tokio::task::spawn_blocking(move || {
                BlockingDatabase::open(schema, &path, max_connections)
            })
            .await??;
            Arc::new(db)
        }
    };

    Ok(db)
}
