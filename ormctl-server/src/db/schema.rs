//! Table definitions for both database files
//!
//! Created on open when absent; there is no migration path beyond that.

use std::fmt;

/// Which set of tables a database file carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// `items`
    Items,
    /// `requests`, `trainings` and the `request_training` link table
    Relations,
}

const ITEMS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        is_active BOOLEAN NOT NULL DEFAULT 1,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_items_name ON items (name)",
];

const RELATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        "group" TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS trainings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        duration INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS request_training (
        request_id INTEGER NOT NULL REFERENCES requests (id) ON DELETE CASCADE,
        training_id INTEGER NOT NULL REFERENCES trainings (id) ON DELETE CASCADE,
        PRIMARY KEY (request_id, training_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_request_training_training ON request_training (training_id)",
];

impl Schema {
    /// DDL statements, one per entry, safe to run repeatedly
    pub fn statements(self) -> &'static [&'static str] {
        match self {
            Schema::Items => ITEMS,
            Schema::Relations => RELATIONS,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Items => f.write_str("items"),
            Schema::Relations => f.write_str("relations"),
        }
    }
}
