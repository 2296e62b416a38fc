//! REST bridge service.
//!
//! # Architecture Overview
//!
//! ```text
//!   bus request (fabric-rest)          ┌──────────────────────────────────────┐
//!   ─────────────────────────────────▶ │              RestBridge              │
//!   (or POST /bus/{channel} locally)   │                                      │
//!                                      │  normalize → encode → invoke ──────────────▶ remote
//!                                      │                          │           │       endpoint
//!                                      │           decode ◀───────┘ ◀─────────────────
//!                                      │             │                        │
//!   ◀───────────────────────────────── │  report (ServiceCore callback)       │
//!                                      └──────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use rest_bridge::bridge::RestBridge;
use rest_bridge::config::{self, BridgeConfig, ConfigOverrides};
use rest_bridge::http::{build_reqwest_client, HttpServer};
use rest_bridge::lifecycle::{shutdown_signal, Shutdown};
use rest_bridge::observability;

#[derive(Parser)]
#[command(name = "rest-bridge")]
#[command(about = "Bridges message-bus requests to outbound HTTP calls", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ingress bind address.
    #[arg(long)]
    bind: Option<String>,

    /// Bus channel to serve.
    #[arg(long)]
    channel: Option<String>,

    /// Authority (host[:port]) replacing every destination URL's host.
    #[arg(long)]
    base_host: Option<String>,

    /// Outbound call timeout in seconds (0 = default).
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => BridgeConfig::default(),
    };
    let config = ConfigOverrides {
        bind_address: cli.bind,
        channel: cli.channel,
        base_host: cli.base_host,
        timeout_secs: cli.timeout_secs,
    }
    .apply(file_config)?;

    observability::logging::init_logging(&config.observability);
    tracing::info!("rest-bridge v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        channel = %config.bridge.channel,
        base_host = ?config.bridge.base_host,
        timeout_secs = config.bridge.timeout().as_secs(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = build_reqwest_client(config.bridge.timeout())?;
    let bridge = Arc::new(RestBridge::with_base_host(client, config.bridge.base_host.clone()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config, bridge);
    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
