//! ormctl CLI - demo CRUD services over SQLite
//!
//! `ormctl serve` runs the HTTP API; `ormctl init` creates the database
//! files and exits. The Tokio runtime is chosen by the session mode:
//! async sessions run on a current-thread runtime, blocking sessions on a
//! multi-threaded one so a query can park its worker.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ormctl_server::SessionMode;
use tokio::runtime::{Builder, Runtime};

mod commands;
mod tracing_setup;

use commands::{InitArgs, ServeArgs};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "ormctl",
    author,
    version,
    about = "Item and request/training CRUD services over SQLite",
    long_about = "Serve an item API, a request/training API with many-to-many links, \
                  and a streaming endpoint. Database access runs through async (sqlx) \
                  or blocking (rusqlite) sessions."
)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Export traces over OTLP (needs the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Create both SQLite files and their tables, then exit
    Init(InitArgs),
}

fn build_runtime(mode: SessionMode) -> Result<Runtime> {
    let mut builder = match mode {
        SessionMode::Async => Builder::new_current_thread(),
        SessionMode::Blocking => Builder::new_multi_thread(),
    };
    builder
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")
}

fn main() -> Result<()> {
    // Load but don't fail if missing
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::Serve(args) => args.resolve()?,
        Commands::Init(args) => args.store.resolve()?,
    };

    let runtime = build_runtime(config.mode)?;
    let tracing_config = TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
        current_thread: config.mode == SessionMode::Async,
    };

    let result = runtime.block_on(async {
        tracing_setup::init(&tracing_config)?;
        tracing::debug!(mode = %config.mode, "runtime ready");

        match cli.command {
            Commands::Serve(_) => commands::run_serve(config).await,
            Commands::Init(_) => commands::run_init(config).await,
        }
    });

    tracing_setup::shutdown_otel();
    result
}
