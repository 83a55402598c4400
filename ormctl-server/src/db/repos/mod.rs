//! Repository traits and their SQL
//!
//! Each repository is a trait implemented by both [`AsyncSession`] and
//! [`BlockingSession`] from the same SQL text. List operations use JOINs
//! (no N+1) and conflicts come from DB constraints (no check-then-insert).
//!
//! [`AsyncSession`]: crate::db::AsyncSession
//! [`BlockingSession`]: crate::db::BlockingSession

pub mod items;
pub mod request_trainings;
pub mod requests;
pub mod trainings;

pub use items::ItemRepository;
pub use request_trainings::RequestTrainingRepository;
pub use requests::RequestRepository;
pub use trainings::TrainingRepository;

use ormctl_core::SqlValue;
use rusqlite::types::Value;
use sqlx::SqliteConnection;

use super::DbError;

/// `UPDATE {table} SET a = ?, b = ? WHERE id = ?`
fn update_statement(table: &str, set: &[(&'static str, SqlValue)]) -> String {
    let columns: Vec<String> = set.iter().map(|(column, _)| format!("{column} = ?")).collect();
    format!("UPDATE {table} SET {} WHERE id = ?", columns.join(", "))
}

/// Apply `set` to row `id` of `table`; returns rows affected.
async fn sqlx_update(
    conn: &mut SqliteConnection,
    table: &str,
    id: i64,
    set: Vec<(&'static str, SqlValue)>,
) -> Result<u64, DbError> {
    let sql = update_statement(table, &set);
    let mut query = sqlx::query(&sql);
    for (_, value) in set {
        query = match value {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Integer(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Text(v) => query.bind(v),
        };
    }
    let result = query.bind(id).execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

/// Blocking twin of [`sqlx_update`]
fn sqlite_update(
    conn: &rusqlite::Connection,
    table: &str,
    id: i64,
    set: Vec<(&'static str, SqlValue)>,
) -> Result<u64, DbError> {
    let sql = update_statement(table, &set);
    let mut params: Vec<Value> = set
        .into_iter()
        .map(|(_, value)| match value {
            SqlValue::Null => Value::Null,
            SqlValue::Integer(v) => Value::Integer(v),
            SqlValue::Bool(v) => Value::Integer(i64::from(v)),
            SqlValue::Text(v) => Value::Text(v),
        })
        .collect();
    params.push(Value::Integer(id));

    let affected = conn.execute(&sql, rusqlite::params_from_iter(params))?;
    Ok(affected as u64)
}
