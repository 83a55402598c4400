//! sqlx-backed sessions

use std::path::Path;

use async_trait::async_trait;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::db::pool::create_pool;
use crate::db::{Database, DbError, Schema, Session, SessionMode};

/// Async database handle
#[derive(Clone)]
pub struct AsyncDatabase {
    pool: SqlitePool,
}

impl AsyncDatabase {
    /// Open the pool and create `schema` if absent.
    pub async fn open(schema: Schema, path: &Path, max_connections: u32) -> Result<Self, DbError> {
        let pool = create_pool(path, max_connections).await?;

        for stmt in schema.statements() {
            sqlx::query(stmt).execute(&pool).await?;
        }
        tracing::debug!(%schema, "schema ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Database for AsyncDatabase {
    fn mode(&self) -> SessionMode {
        SessionMode::Async
    }

    async fn begin(&self) -> Result<Box<dyn Session>, DbError> {
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(Box::new(AsyncSession { tx: Some(tx) }))
    }

    async fn begin_read(&self) -> Result<Box<dyn Session>, DbError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(AsyncSession { tx: Some(tx) }))
    }
}

/// One sqlx transaction. sqlx rolls it back if it is dropped while open.
pub struct AsyncSession {
    tx: Option<Transaction<'static, Sqlite>>,
}

impl AsyncSession {
    /// Connection of the open transaction
    pub(crate) fn conn(&mut self) -> Result<&mut SqliteConnection, DbError> {
        self.tx.as_deref_mut().ok_or(DbError::SessionClosed)
    }
}

#[async_trait]
impl Session for AsyncSession {
    async fn commit(&mut self) -> Result<(), DbError> {
        let tx = self.tx.take().ok_or(DbError::SessionClosed)?;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        let tx = self.tx.take().ok_or(DbError::SessionClosed)?;
        tx.rollback().await?;
        Ok(())
    }
}
