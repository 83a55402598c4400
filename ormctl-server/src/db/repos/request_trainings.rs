//! Request ↔ training link table

use async_trait::async_trait;

use crate::db::{AsyncSession, BlockingSession, DbError};

const INSERT: &str = "INSERT INTO request_training (request_id, training_id) VALUES (?, ?)";

const DELETE: &str = "DELETE FROM request_training WHERE request_id = ? AND training_id = ?";

#[async_trait]
pub trait RequestTrainingRepository: Send {
    /// Link a request to a training. A pair that is already linked fails
    /// with [`DbError::Conflict`] from the composite primary key.
    async fn associate(&mut self, request_id: i64, training_id: i64) -> Result<(), DbError>;

    /// Remove a link. Returns false when the pair was not linked.
    async fn disassociate(&mut self, request_id: i64, training_id: i64) -> Result<bool, DbError>;
}

#[async_trait]
impl RequestTrainingRepository for AsyncSession {
    async fn associate(&mut self, request_id: i64, training_id: i64) -> Result<(), DbError> {
        sqlx::query(INSERT)
            .bind(request_id)
            .bind(training_id)
            .execute(&mut *self.conn()?)
            .await?;
        Ok(())
    }

    async fn disassociate(&mut self, request_id: i64, training_id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(DELETE)
            .bind(request_id)
            .bind(training_id)
            .execute(&mut *self.conn()?)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RequestTrainingRepository for BlockingSession {
    async fn associate(&mut self, request_id: i64, training_id: i64) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(INSERT, [request_id, training_id])?;
            Ok(())
        })
    }

    async fn disassociate(&mut self, request_id: i64, training_id: i64) -> Result<bool, DbError> {
        self.with_conn(|conn| Ok(conn.execute(DELETE, [request_id, training_id])? > 0))
    }
}
