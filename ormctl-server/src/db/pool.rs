//! Connection pool management
//!
//! Both pools open the same kind of SQLite file with the same pragmas:
//! foreign keys enforced, WAL journal, 5 second busy timeout, file created
//! when missing.

use std::path::Path;
use std::time::Duration;

use r2d2_sqlite::SqliteConnectionManager;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Default maximum connections for the pool.
/// Kept low for single-user tooling.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool of blocking rusqlite connections
pub type BlockingPool = r2d2::Pool<SqliteConnectionManager>;

/// Create an async sqlx pool over the file at `path`.
pub async fn create_pool(path: &Path, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
}

/// Create an r2d2 pool of rusqlite connections over the file at `path`.
///
/// Blocks while the first connection is established; call it off the
/// async worker threads.
pub fn create_blocking_pool(path: &Path, max_connections: u32) -> Result<BlockingPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        Ok(())
    });

    r2d2::Pool::builder()
        .max_size(max_connections.max(1))
        .build(manager)
}
