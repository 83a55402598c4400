//! rusqlite-backed sessions

use std::path::Path;

use async_trait::async_trait;
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use super::run_blocking;
use crate::db::pool::{create_blocking_pool, BlockingPool};
use crate::db::{Database, DbError, Schema, Session, SessionMode};

/// Blocking database handle
#[derive(Clone)]
pub struct BlockingDatabase {
    pool: BlockingPool,
}

impl BlockingDatabase {
    /// Open the pool and create `schema` if absent. Blocks the caller.
    pub fn open(schema: Schema, path: &Path, max_connections: u32) -> Result<Self, DbError> {
        let pool = create_blocking_pool(path, max_connections)?;

        let conn = pool.get()?;
        for stmt in schema.statements() {
            conn.execute(stmt, [])?;
        }
        tracing::debug!(%schema, "schema ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &BlockingPool {
        &self.pool
    }

    fn start(&self, statement: &str) -> Result<Box<dyn Session>, DbError> {
        let conn = run_blocking(|| -> Result<_, DbError> {
            let conn = self.pool.get()?;
            // a previous holder may have failed to roll back
            if !conn.is_autocommit() {
                conn.execute_batch("ROLLBACK")?;
            }
            conn.execute_batch(statement)?;
            Ok(conn)
        })?;

        Ok(Box::new(BlockingSession { conn: Some(conn) }))
    }
}

#[async_trait]
impl Database for BlockingDatabase {
    fn mode(&self) -> SessionMode {
        SessionMode::Blocking
    }

    async fn begin(&self) -> Result<Box<dyn Session>, DbError> {
        self.start("BEGIN IMMEDIATE")
    }

    async fn begin_read(&self) -> Result<Box<dyn Session>, DbError> {
        self.start("BEGIN")
    }
}

/// Pooled connection with an open transaction
pub struct BlockingSession {
    conn: Option<PooledConnection<SqliteConnectionManager>>,
}

impl BlockingSession {
    /// Run `f` against the open transaction, blocking this worker thread.
    pub(crate) fn with_conn<T>(
        &mut self,
        f: impl FnOnce(&Connection) -> Result<T, DbError>,
    ) -> Result<T, DbError> {
        let conn = self.conn.as_deref().ok_or(DbError::SessionClosed)?;
        run_blocking(|| f(conn))
    }

    fn finish(&mut self, statement: &str) -> Result<(), DbError> {
        let conn = self.conn.take().ok_or(DbError::SessionClosed)?;
        run_blocking(|| conn.execute_batch(statement))?;
        Ok(())
    }
}

#[async_trait]
impl Session for BlockingSession {
    async fn commit(&mut self) -> Result<(), DbError> {
        self.finish("COMMIT")
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        self.finish("ROLLBACK")
    }
}

impl Drop for BlockingSession {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = run_blocking(|| conn.execute_batch("ROLLBACK")) {
                tracing::warn!(error = %e, "rollback of abandoned session failed");
            }
        }
    }
}
