//! Spendline Record Server
//!
//! Run with: cargo run --bin spendline-api
//!
//! # Configuration
//!
//! Settings come from the config file (see `spendline config`), with these
//! environment overrides:
//! - `SPENDLINE_HOST`: Host to bind to (default: 0.0.0.0)
//! - `SPENDLINE_PORT`: Port to listen on (default: 3000)
//! - `SPENDLINE_DATA_FILE`: JSON file for records; empty keeps them in memory
//! - `SPENDLINE_LOG_LEVEL` / `SPENDLINE_LOG_FORMAT`
//! - `RUST_LOG`: Full filter directive, overrides the level

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use spendline::api::{serve, ApiConfig, AppState, RecordStore};
use spendline::config::Config;
use spendline::logging::init_logging;

#[derive(Parser)]
#[command(name = "spendline-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reference record server for Spendline")]
struct Args {
    /// Config file (default: searched in the usual locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep records in memory only
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.ephemeral {
        config.server.data_file = None;
    }

    init_logging(&config.logging)?;

    tracing::info!("Starting Spendline record server v{}", env!("CARGO_PKG_VERSION"));

    let store = match &config.server.data_file {
        Some(path) => {
            tracing::info!("Data file: {}", path);
            RecordStore::open(path).await?
        }
        None => {
            tracing::info!("No data file configured, records are kept in memory");
            RecordStore::in_memory()
        }
    };

    let api_config = ApiConfig::from(&config.server);
    let state = AppState::new(Arc::new(store), api_config.clone());

    serve(state, &api_config).await?;

    tracing::info!("Spendline record server stopped");
    Ok(())
}
