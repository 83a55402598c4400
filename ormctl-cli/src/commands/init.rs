//! Create both database files and their schemas, then exit

use anyhow::{Context, Result};
use clap::Parser;
use ormctl_server::ServerConfig;

use super::StoreArgs;

/// Arguments for the init command
#[derive(Parser, Debug, Clone, Default)]
pub struct InitArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run_init(config: ServerConfig) -> Result<()> {
    ormctl_server::init_databases(&config)
        .await
        .context("Failed to initialize databases")?;
    Ok(())
}
