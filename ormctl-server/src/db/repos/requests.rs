//! Request repository, including the eager-loaded request → trainings view

use async_trait::async_trait;
use ormctl_core::models::{NewRequest, Request, RequestChanges, RequestWithTrainings};
use ormctl_core::{fold_request_rows, Assignments, RequestTrainingRow};
use rusqlite::OptionalExtension;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{sqlite_update, sqlx_update};
use crate::db::{AsyncSession, BlockingSession, DbError};

const GET: &str = r#"SELECT id, name, description, "group" FROM requests WHERE id = ?"#;

const INSERT: &str = r#"INSERT INTO requests (name, description, "group") VALUES (?, ?, ?)
                        RETURNING id, name, description, "group""#;

const DELETE: &str = "DELETE FROM requests WHERE id = ?";

/// One round trip: requests with their trainings, NULL training columns
/// for requests without any.
const WITH_TRAININGS: &str = r#"
    SELECT r.id AS request_id, r.name AS request_name,
           t.id AS training_id, t.title AS training_title
    FROM requests r
    LEFT JOIN request_training rt ON rt.request_id = r.id
    LEFT JOIN trainings t ON t.id = rt.training_id
    ORDER BY r.id, t.id
"#;

const ONE_WITH_TRAININGS: &str = r#"
    SELECT r.id AS request_id, r.name AS request_name,
           t.id AS training_id, t.title AS training_title
    FROM requests r
    LEFT JOIN request_training rt ON rt.request_id = r.id
    LEFT JOIN trainings t ON t.id = rt.training_id
    WHERE r.id = ?
    ORDER BY t.id
"#;

#[async_trait]
pub trait RequestRepository: Send {
    /// Every request with a nested, possibly empty, list of trainings
    async fn list_requests_with_trainings(&mut self) -> Result<Vec<RequestWithTrainings>, DbError>;

    async fn get_request(&mut self, id: i64) -> Result<Option<Request>, DbError>;

    async fn get_request_with_trainings(
        &mut self,
        id: i64,
    ) -> Result<Option<RequestWithTrainings>, DbError>;

    async fn insert_request(&mut self, request: &NewRequest) -> Result<Request, DbError>;

    /// Returns false when no such request exists.
    async fn update_request(&mut self, id: i64, changes: &RequestChanges) -> Result<bool, DbError>;

    /// Returns false when no such request exists. Links cascade.
    async fn delete_request(&mut self, id: i64) -> Result<bool, DbError>;
}

fn request_from_sqlx(row: &SqliteRow) -> Result<Request, sqlx::Error> {
    Ok(Request {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        group: row.try_get("group")?,
    })
}

fn request_from_sqlite(row: &rusqlite::Row<'_>) -> rusqlite::Result<Request> {
    Ok(Request {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        group: row.get("group")?,
    })
}

fn joined_from_sqlx(row: &SqliteRow) -> Result<RequestTrainingRow, sqlx::Error> {
    Ok(RequestTrainingRow {
        request_id: row.try_get("request_id")?,
        request_name: row.try_get("request_name")?,
        training_id: row.try_get("training_id")?,
        training_title: row.try_get("training_title")?,
    })
}

fn joined_from_sqlite(row: &rusqlite::Row<'_>) -> rusqlite::Result<RequestTrainingRow> {
    Ok(RequestTrainingRow {
        request_id: row.get("request_id")?,
        request_name: row.get("request_name")?,
        training_id: row.get("training_id")?,
        training_title: row.get("training_title")?,
    })
}

#[async_trait]
impl RequestRepository for AsyncSession {
    async fn list_requests_with_trainings(&mut self) -> Result<Vec<RequestWithTrainings>, DbError> {
        let rows = sqlx::query(WITH_TRAININGS)
            .fetch_all(&mut *self.conn()?)
            .await?;
        let joined = rows
            .iter()
            .map(joined_from_sqlx)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fold_request_rows(joined)?)
    }

    async fn get_request(&mut self, id: i64) -> Result<Option<Request>, DbError> {
        let row = sqlx::query(GET)
            .bind(id)
            .fetch_optional(&mut *self.conn()?)
            .await?;
        Ok(row.as_ref().map(request_from_sqlx).transpose()?)
    }

    async fn get_request_with_trainings(
        &mut self,
        id: i64,
    ) -> Result<Option<RequestWithTrainings>, DbError> {
        let rows = sqlx::query(ONE_WITH_TRAININGS)
            .bind(id)
            .fetch_all(&mut *self.conn()?)
            .await?;
        let joined = rows
            .iter()
            .map(joined_from_sqlx)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fold_request_rows(joined)?.into_iter().next())
    }

    async fn insert_request(&mut self, request: &NewRequest) -> Result<Request, DbError> {
        let row = sqlx::query(INSERT)
            .bind(request.name.as_str())
            .bind(&request.description)
            .bind(&request.group)
            .fetch_one(&mut *self.conn()?)
            .await?;
        Ok(request_from_sqlx(&row)?)
    }

    async fn update_request(&mut self, id: i64, changes: &RequestChanges) -> Result<bool, DbError> {
        if changes.is_empty() {
            return Ok(self.get_request(id).await?.is_some());
        }
        let affected = sqlx_update(self.conn()?, "requests", id, changes.assignments()).await?;
        Ok(affected > 0)
    }

    async fn delete_request(&mut self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(DELETE)
            .bind(id)
            .execute(&mut *self.conn()?)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RequestRepository for BlockingSession {
    async fn list_requests_with_trainings(&mut self) -> Result<Vec<RequestWithTrainings>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(WITH_TRAININGS)?;
            let joined = stmt
                .query_map([], joined_from_sqlite)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(fold_request_rows(joined)?)
        })
    }

    async fn get_request(&mut self, id: i64) -> Result<Option<Request>, DbError> {
        self.with_conn(|conn| {
            Ok(conn
                .prepare_cached(GET)?
                .query_row([id], request_from_sqlite)
                .optional()?)
        })
    }

    async fn get_request_with_trainings(
        &mut self,
        id: i64,
    ) -> Result<Option<RequestWithTrainings>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(ONE_WITH_TRAININGS)?;
            let joined = stmt
                .query_map([id], joined_from_sqlite)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(fold_request_rows(joined)?.into_iter().next())
        })
    }

    async fn insert_request(&mut self, request: &NewRequest) -> Result<Request, DbError> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                INSERT,
                rusqlite::params![request.name.as_str(), request.description, request.group],
                request_from_sqlite,
            )?)
        })
    }

    async fn update_request(&mut self, id: i64, changes: &RequestChanges) -> Result<bool, DbError> {
        if changes.is_empty() {
            return Ok(self.get_request(id).await?.is_some());
        }
        let set = changes.assignments();
        let affected = self.with_conn(|conn| sqlite_update(conn, "requests", id, set))?;
        Ok(affected > 0)
    }

    async fn delete_request(&mut self, id: i64) -> Result<bool, DbError> {
        self.with_conn(|conn| Ok(conn.execute(DELETE, [id])? > 0))
    }
}
