//! Training repository

use async_trait::async_trait;
use ormctl_core::models::{NewTraining, RequestSummary, Training, TrainingChanges};
use ormctl_core::Assignments;
use rusqlite::OptionalExtension;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{sqlite_update, sqlx_update};
use crate::db::{AsyncSession, BlockingSession, DbError};

const LIST: &str = "SELECT id, title, duration FROM trainings ORDER BY id";

const GET: &str = "SELECT id, title, duration FROM trainings WHERE id = ?";

const INSERT: &str = "INSERT INTO trainings (title, duration) VALUES (?, ?) \
                      RETURNING id, title, duration";

const DELETE: &str = "DELETE FROM trainings WHERE id = ?";

/// Reverse direction of the link: requests that require a training
const REQUESTS_FOR: &str = r#"
    SELECT r.id, r.name
    FROM request_training rt
    JOIN requests r ON r.id = rt.request_id
    WHERE rt.training_id = ?
    ORDER BY r.id
"#;

#[async_trait]
pub trait TrainingRepository: Send {
    async fn list_trainings(&mut self) -> Result<Vec<Training>, DbError>;

    async fn get_training(&mut self, id: i64) -> Result<Option<Training>, DbError>;

    async fn insert_training(&mut self, training: &NewTraining) -> Result<Training, DbError>;

    /// Returns false when no such training exists.
    async fn update_training(&mut self, id: i64, changes: &TrainingChanges)
        -> Result<bool, DbError>;

    /// Returns false when no such training exists. Links cascade.
    async fn delete_training(&mut self, id: i64) -> Result<bool, DbError>;

    async fn list_training_requests(&mut self, id: i64) -> Result<Vec<RequestSummary>, DbError>;
}

fn training_from_sqlx(row: &SqliteRow) -> Result<Training, sqlx::Error> {
    Ok(Training {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        duration: row.try_get("duration")?,
    })
}

fn training_from_sqlite(row: &rusqlite::Row<'_>) -> rusqlite::Result<Training> {
    Ok(Training {
        id: row.get("id")?,
        title: row.get("title")?,
        duration: row.get("duration")?,
    })
}

fn summary_from_sqlx(row: &SqliteRow) -> Result<RequestSummary, sqlx::Error> {
    Ok(RequestSummary {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

#[async_trait]
impl TrainingRepository for AsyncSession {
    async fn list_trainings(&mut self) -> Result<Vec<Training>, DbError> {
        let rows = sqlx::query(LIST).fetch_all(&mut *self.conn()?).await?;
        Ok(rows
            .iter()
            .map(training_from_sqlx)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_training(&mut self, id: i64) -> Result<Option<Training>, DbError> {
        let row = sqlx::query(GET)
            .bind(id)
            .fetch_optional(&mut *self.conn()?)
            .await?;
        Ok(row.as_ref().map(training_from_sqlx).transpose()?)
    }

    async fn insert_training(&mut self, training: &NewTraining) -> Result<Training, DbError> {
        let row = sqlx::query(INSERT)
            .bind(training.title.as_str())
            .bind(training.duration)
            .fetch_one(&mut *self.conn()?)
            .await?;
        Ok(training_from_sqlx(&row)?)
    }

    async fn update_training(
        &mut self,
        id: i64,
        changes: &TrainingChanges,
    ) -> Result<bool, DbError> {
        if changes.is_empty() {
            return Ok(self.get_training(id).await?.is_some());
        }
        let affected = sqlx_update(self.conn()?, "trainings", id, changes.assignments()).await?;
        Ok(affected > 0)
    }

    async fn delete_training(&mut self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(DELETE)
            .bind(id)
            .execute(&mut *self.conn()?)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_training_requests(&mut self, id: i64) -> Result<Vec<RequestSummary>, DbError> {
        let rows = sqlx::query(REQUESTS_FOR)
            .bind(id)
            .fetch_all(&mut *self.conn()?)
            .await?;
        Ok(rows
            .iter()
            .map(summary_from_sqlx)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[async_trait]
impl TrainingRepository for BlockingSession {
    async fn list_trainings(&mut self) -> Result<Vec<Training>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(LIST)?;
            let trainings = stmt
                .query_map([], training_from_sqlite)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(trainings)
        })
    }

    async fn get_training(&mut self, id: i64) -> Result<Option<Training>, DbError> {
        self.with_conn(|conn| {
            Ok(conn
                .prepare_cached(GET)?
                .query_row([id], training_from_sqlite)
                .optional()?)
        })
    }

    async fn insert_training(&mut self, training: &NewTraining) -> Result<Training, DbError> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                INSERT,
                rusqlite::params![training.title.as_str(), training.duration],
                training_from_sqlite,
            )?)
        })
    }

    async fn update_training(
        &mut self,
        id: i64,
        changes: &TrainingChanges,
    ) -> Result<bool, DbError> {
        if changes.is_empty() {
            return Ok(self.get_training(id).await?.is_some());
        }
        let set = changes.assignments();
        let affected = self.with_conn(|conn| sqlite_update(conn, "trainings", id, set))?;
        Ok(affected > 0)
    }

    async fn delete_training(&mut self, id: i64) -> Result<bool, DbError> {
        self.with_conn(|conn| Ok(conn.execute(DELETE, [id])? > 0))
    }

    async fn list_training_requests(&mut self, id: i64) -> Result<Vec<RequestSummary>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(REQUESTS_FOR)?;
            let requests = stmt
                .query_map([id], |row| {
                    Ok(RequestSummary {
                        id: row.get("id")?,
                        name: row.get("name")?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(requests)
        })
    }
}
