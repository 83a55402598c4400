//! ormctl-server: CRUD services over SQLite
//!
//! Serves the item API, the request/training API and a streaming endpoint
//! from one axum router. Every handler works through a [`db::Session`],
//! which is either an async sqlx transaction or a blocking rusqlite one
//! depending on [`db::SessionMode`].

pub mod config;
pub mod db;
pub mod http;

pub use config::{ConfigError, ServerConfig};
pub use db::{Database, DbError, Session, SessionMode};
pub use http::{build_router, init_databases, open_state, run_server, ApiError, AppState, ServerError};
