//! Server configuration
//!
//! Defaults can be overridden from a TOML file; the CLI layers its flags
//! (and their `ORMCTL_*` environment variables) on top.
//!
//! ```toml
//! bind_addr = "127.0.0.1:8000"
//! mode = "blocking"
//! items_db = "./items.db"
//! relations_db = "./relation.db"
//! max_connections = 5
//! stream_interval_ms = 1000
//! stream_count = 5
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ormctl_core::FeedSettings;
use serde::{Deserialize, Serialize};

use crate::db::pool::DEFAULT_MAX_CONNECTIONS;
use crate::db::SessionMode;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    /// Session kind used by every handler
    pub mode: SessionMode,

    /// SQLite file holding `items`
    pub items_db: PathBuf,

    /// SQLite file holding requests, trainings and their links
    pub relations_db: PathBuf,

    /// Pool size per database file
    pub max_connections: u32,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Pause between streamed chunks
    pub stream_interval_ms: u64,

    /// Chunks per streamed response
    pub stream_count: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let feed = FeedSettings::default();
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            mode: SessionMode::default(),
            items_db: PathBuf::from("./items.db"),
            relations_db: PathBuf::from("./relation.db"),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            cors_permissive: false,
            stream_interval_ms: feed.interval.as_millis() as u64,
            stream_count: feed.count,
        }
    }
}

/// Config file error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ServerConfig {
    /// Load a TOML file; keys it omits keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            count: self.stream_count,
            interval: Duration::from_millis(self.stream_interval_ms),
        }
    }
}
