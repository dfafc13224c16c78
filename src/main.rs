//! HTTP Relay Server
//!
//! A single-endpoint relay built with Tokio and Axum: clients POST a JSON
//! description of an outbound HTTP request, the relay performs it and
//! replies with a JSON summary.
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                  HTTP RELAY                   │
//!                     │                                               │
//!   POST / ───────────┼─▶ relay handler ──▶ transport ────────────────┼──▶ target URL
//!                     │        │                                      │
//!   JSON summary ◀────┼────────┤                                      │
//!                     │        ▼                                      │
//!                     │   traffic log ──(after shutdown)──▶ stdout    │
//!                     └──────────────────────────────────────────────┘
//! ```
//!
//! Every forwarded request carries an injected `X-Hhp-Trace-Id` header equal
//! to the `id` returned to the caller, so exchanges can be correlated across
//! the caller, the relay's logs, and the target.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use http_relay::config::{load_config, RelayConfig};
use http_relay::http::RelayServer;
use http_relay::lifecycle::Shutdown;
use http_relay::observability;
use http_relay::traffic::TrafficLog;
use http_relay::transport::HyperTransport;

#[derive(Parser)]
#[command(name = "http-relay")]
#[command(about = "Relay JSON-described HTTP requests and capture the traffic", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured listen address.
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.listener.bind_address = listen;
    }

    observability::logging::init(&config.observability);

    tracing::info!("http-relay v0.1.0 starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Assemble the relay: traffic log and transport are constructed here and
    // injected, never reached through globals.
    let traffic = TrafficLog::new();
    let transport = Arc::new(HyperTransport::new(config.timeouts.upstream()));
    let server = RelayServer::new(config, transport, traffic.clone());

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install interrupt handler");
            return;
        }
        tracing::info!("Interrupt received");
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!(records = traffic.len(), "Shutdown complete");

    // The server has fully drained; the log is stable from here on.
    println!("{}", traffic.dump_json()?);
    Ok(())
}
