//! Content edge façade.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ dispatcher ──┬──▶ cache store (lookup)
//!                    (timeout,                     │
//!                     request-id,                  ├──▶ router ──▶ handler ──▶ upstream API
//!                     trace)                       │
//!     Client Response                              └──▶ cache store (put, 2xx only)
//!     ◀────────────── ApiResponse + CORS
//!
//!     Cache hit: the stored response is returned at once and the handler
//!     runs again in a detached task to refresh the entry.
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use content_edge::config::{self, loader::finalize, FacadeConfig};
use content_edge::http::HttpServer;
use content_edge::lifecycle::{signals, Shutdown};
use content_edge::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "content-edge")]
#[command(about = "Cached HTTP façade over a content API", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => finalize(FacadeConfig::default())?,
    };

    logging::init(&config.observability.log_level)?;
    tracing::info!("content-edge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        static_token = config.upstream.token.is_some(),
        cache_enabled = config.cache.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
