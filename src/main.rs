//! Jokes API server.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                  JOKES API                   │
//!   Client Request    │  ┌────────────┐    ┌──────────────────────┐  │
//!   ──────────────────┼─▶│ middleware │───▶│ router               │  │
//!                     │  │ id/trace/  │    │  /joke /all /likes ──┼──┼─▶ JokeBook / LikeCounter
//!                     │  │ timeout/   │    │  /user ──────────────┼──┼─▶ UserStore ──▶ MongoDB
//!   Client Response   │  │ limit/cors │    │  fallback ───────────┼──┼─▶ static files
//!   ◀─────────────────┼──│            │◀───│                      │  │
//!                     │  └────────────┘    └──────────────────────┘  │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use jokes_api::config::{
    apply_env_overrides, load_config, validation::validate_config, ConfigError, ServerConfig,
    StoreBackend,
};
use jokes_api::observability::{logging, metrics};
use jokes_api::{users, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "jokes-api")]
#[command(about = "HTTP API serving jokes, likes and a user directory", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Keep users in process memory instead of MongoDB.
    #[arg(long)]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if args.memory_store {
        config.database.backend = StoreBackend::Memory;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "jokes-api starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.database.backend,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let store = users::open_store(&config.database).await?;
    tracing::info!("User store reachable");

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, store);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
