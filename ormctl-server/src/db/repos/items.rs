//! Item repository

use async_trait::async_trait;
use ormctl_core::models::{Item, ItemChanges, NewItem};
use ormctl_core::{Assignments, ItemRow};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{sqlite_update, sqlx_update};
use crate::db::{AsyncSession, BlockingSession, DbError};

const LIST: &str = "SELECT id, name, description, is_active, created_at FROM items ORDER BY id";

const GET: &str = "SELECT id, name, description, is_active, created_at FROM items WHERE id = ?";

const INSERT: &str = "INSERT INTO items (name, description, is_active) VALUES (?, ?, 1) \
                      RETURNING id, name, description, is_active, created_at";

const DELETE: &str = "DELETE FROM items WHERE id = ?";

#[async_trait]
pub trait ItemRepository: Send {
    /// All items in insertion order
    async fn list_items(&mut self) -> Result<Vec<Item>, DbError>;

    async fn get_item(&mut self, id: i64) -> Result<Option<Item>, DbError>;

    /// Insert an active item; `id` and `created_at` are assigned by SQLite.
    async fn insert_item(&mut self, item: &NewItem) -> Result<Item, DbError>;

    /// Apply `changes` to item `id`. Returns false when no such item exists.
    /// An empty change set issues no UPDATE.
    async fn update_item(&mut self, id: i64, changes: &ItemChanges) -> Result<bool, DbError>;

    /// Returns false when no such item exists.
    async fn delete_item(&mut self, id: i64) -> Result<bool, DbError>;
}

fn from_sqlx(row: &SqliteRow) -> Result<Item, DbError> {
    let raw = ItemRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    };
    Ok(Item::try_from(raw)?)
}

fn from_sqlite(row: &rusqlite::Row<'_>) -> rusqlite::Result<ItemRow> {
    Ok(ItemRow {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        is_active: row.get("is_active")?,
        created_at: row.get("created_at")?,
    })
}

#[async_trait]
impl ItemRepository for AsyncSession {
    async fn list_items(&mut self) -> Result<Vec<Item>, DbError> {
        let rows = sqlx::query(LIST).fetch_all(&mut *self.conn()?).await?;
        rows.iter().map(from_sqlx).collect()
    }

    async fn get_item(&mut self, id: i64) -> Result<Option<Item>, DbError> {
        let row = sqlx::query(GET)
            .bind(id)
            .fetch_optional(&mut *self.conn()?)
            .await?;
        row.as_ref().map(from_sqlx).transpose()
    }

    async fn insert_item(&mut self, item: &NewItem) -> Result<Item, DbError> {
        let row = sqlx::query(INSERT)
            .bind(item.name.as_str())
            .bind(&item.description)
            .fetch_one(&mut *self.conn()?)
            .await?;
        from_sqlx(&row)
    }

    async fn update_item(&mut self, id: i64, changes: &ItemChanges) -> Result<bool, DbError> {
        if changes.is_empty() {
            return Ok(self.get_item(id).await?.is_some());
        }
        let affected = sqlx_update(self.conn()?, "items", id, changes.assignments()).await?;
        Ok(affected > 0)
    }

    async fn delete_item(&mut self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(DELETE)
            .bind(id)
            .execute(&mut *self.conn()?)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ItemRepository for BlockingSession {
    async fn list_items(&mut self) -> Result<Vec<Item>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(LIST)?;
            let rows = stmt
                .query_map([], from_sqlite)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter()
                .map(|row| Item::try_from(row).map_err(DbError::from))
                .collect()
        })
    }

    async fn get_item(&mut self, id: i64) -> Result<Option<Item>, DbError> {
        use rusqlite::OptionalExtension;

        self.with_conn(|conn| {
            let row = conn
                .prepare_cached(GET)?
                .query_row([id], from_sqlite)
                .optional()?;
            Ok(row.map(Item::try_from).transpose()?)
        })
    }

    async fn insert_item(&mut self, item: &NewItem) -> Result<Item, DbError> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                INSERT,
                rusqlite::params![item.name.as_str(), item.description],
                from_sqlite,
            )?;
            Ok(Item::try_from(row)?)
        })
    }

    async fn update_item(&mut self, id: i64, changes: &ItemChanges) -> Result<bool, DbError> {
        if changes.is_empty() {
            return Ok(self.get_item(id).await?.is_some());
        }
        let set = changes.assignments();
        let affected = self.with_conn(|conn| sqlite_update(conn, "items", id, set))?;
        Ok(affected > 0)
    }

    async fn delete_item(&mut self, id: i64) -> Result<bool, DbError> {
        self.with_conn(|conn| Ok(conn.execute(DELETE, [id])? > 0))
    }
}
