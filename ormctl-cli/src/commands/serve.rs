//! HTTP server command
//!
//! Runs the item, request/training and streaming routes until Ctrl+C or
//! SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use ormctl_server::ServerConfig;

use super::StoreArgs;

/// Arguments for the serve command
#[derive(Parser, Debug, Clone, Default)]
pub struct ServeArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Address to bind to (default: 127.0.0.1:8000)
    #[arg(long, short = 'b', env = "ORMCTL_BIND")]
    pub bind: Option<SocketAddr>,

    /// Connections per database pool
    #[arg(long, env = "ORMCTL_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long, env = "ORMCTL_CORS_PERMISSIVE")]
    pub cors_permissive: bool,

    /// Pause between streamed chunks, in milliseconds
    #[arg(long, env = "ORMCTL_STREAM_INTERVAL_MS")]
    pub stream_interval_ms: Option<u64>,

    /// Chunks per streamed response
    #[arg(long, env = "ORMCTL_STREAM_COUNT")]
    pub stream_count: Option<u32>,
}

impl ServeArgs {
    pub fn resolve(&self) -> Result<ServerConfig> {
        let mut config = self.store.resolve()?;

        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(max) = self.max_connections {
            config.max_connections = max;
        }
        if self.cors_permissive {
            config.cors_permissive = true;
        }
        if let Some(ms) = self.stream_interval_ms {
            config.stream_interval_ms = ms;
        }
        if let Some(count) = self.stream_count {
            config.stream_count = count;
        }
        Ok(config)
    }
}

/// Run the HTTP server (returns after graceful shutdown)
pub async fn run_serve(config: ServerConfig) -> Result<()> {
    tracing::info!(
        mode = %config.mode,
        items_db = %config.items_db.display(),
        relations_db = %config.relations_db.display(),
        "Starting ormctl server on {}",
        config.bind_addr
    );
    if config.cors_permissive {
        tracing::warn!("CORS is permissive: any origin may call the API");
    }

    ormctl_server::run_server(config)
        .await
        .context("Server error")?;

    Ok(())
}
