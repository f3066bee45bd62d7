//! Diagnostic HTTP echo service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum::serve ──▶ middleware ──▶ dispatch ──▶ routing::Router
//!                                    (trace, panic,             (method + pattern,
//!                                     timeout)                   first match wins)
//!                                                                      │
//!                                                                      ▼
//!     Client Response                                           handlers::*
//!     ◀────────────── Reply ◀──────────────────────────────────  (echo, cookies,
//!                                                                 synthetic, dns)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use echo_server::config::{apply_env, load_config, EchoConfig, PortSource, Variant};
use echo_server::lifecycle::{signals, Shutdown};
use echo_server::observability::{init_logging, metrics};
use echo_server::EchoServer;

#[derive(Parser)]
#[command(name = "echo-server")]
#[command(about = "Diagnostic HTTP echo service", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Deployment variant (standalone or hosted)
    #[arg(long)]
    variant: Option<Variant>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EchoConfig::default(),
    };
    if let Some(variant) = cli.variant {
        config.routes.variant = variant;
    }
    let port_source = apply_env(&mut config)?;

    init_logging(&config.observability);
    tracing::info!("echo-server v{} starting", env!("CARGO_PKG_VERSION"));

    if port_source == PortSource::Config {
        tracing::info!(port = config.listener.port, "PORT not set, using default port");
    }
    tracing::info!(
        variant = %config.routes.variant,
        dns_enabled = config.routes.dns_enabled(),
        client_ip = ?config.routes.client_ip_source(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        port = config.listener.port,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = EchoServer::new(config)?;

    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
