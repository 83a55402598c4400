//! Command implementations for the ormctl CLI
//!
//! Both commands resolve a [`ServerConfig`] the same way: defaults, then the
//! optional TOML file, then flags (each flag also reads its `ORMCTL_*`
//! environment variable).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ormctl_server::{ServerConfig, SessionMode};

pub mod init;
pub mod serve;

pub use init::{run_init, InitArgs};
pub use serve::{run_serve, ServeArgs};

/// Flags shared by every command that touches the databases
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// TOML config file; flags override its values
    #[arg(long, short = 'c', env = "ORMCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Session mode: async (sqlx) or blocking (rusqlite)
    #[arg(long, env = "ORMCTL_MODE")]
    pub mode: Option<SessionMode>,

    /// SQLite file for the item API
    #[arg(long, env = "ORMCTL_ITEMS_DB")]
    pub items_db: Option<PathBuf>,

    /// SQLite file for requests and trainings
    #[arg(long, env = "ORMCTL_RELATIONS_DB")]
    pub relations_db: Option<PathBuf>,
}

impl StoreArgs {
    /// Load the config file (or defaults) and apply these flags on top
    pub fn resolve(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(path) = &self.items_db {
            config.items_db = path.clone();
        }
        if let Some(path) = &self.relations_db {
            config.relations_db = path.clone();
        }
        Ok(config)
    }
}
