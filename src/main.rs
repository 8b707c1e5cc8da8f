//! FTO Scout API Proxy
//!
//! Request-forwarding edge service for browser clients that need to reach
//! patent and scholarly APIs without running into cross-origin limits.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ request id ─▶ trace ─▶ cors ─▶ handler     │
//!                           │                                  │           │
//!                           │                                  ▼           │
//!                           │                        routing::resolve      │
//!                           │           preflight / health / 404 │ forward │
//!                           │                                    ▼         │
//!                           │                      upstream::Forwarder ────┼──▶ api.patentsview.org
//!     Client Response       │                                    │         │    export.arxiv.org
//!     ◀─────────────────────┼──────────── response::relay ◀──────┘         │    api.lens.org ...
//!                           └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use fto_scout_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use fto_scout_proxy::http::{shutdown_signal, HttpServer};
use fto_scout_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "fto-scout-proxy")]
#[command(version, about = "CORS relay for patent and scholarly data APIs", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("fto-scout-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );
    if config.cors.allowed_origins.is_empty() {
        tracing::warn!("cors.allowed_origins is empty; any Origin will be echoed");
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
