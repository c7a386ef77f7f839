//! health-probe
//!
//! Serves an aggregate liveness check for a configured set of upstream
//! targets.
//!
//! ```text
//!   GET .../health ──▶ health shim ──▶ probe every target (concurrently)
//!                           │                     │
//!                           │                     ▼
//!   anything else ──────────┘             200 ok / 417 failed
//!        │
//!        ▼
//!   next stage (404)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use health_probe::config::{load_config, watcher::ConfigWatcher, ProbeConfig};
use health_probe::discovery::SharedTargets;
use health_probe::observability::{logging, metrics};
use health_probe::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "health-probe")]
#[command(about = "Aggregate liveness probe for upstream targets", long_about = None)]
struct Args {
    /// TOML config file. Targets are reloaded when it changes.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProbeConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;
    tracing::info!("health-probe v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        targets = config.targets.len(),
        probe_timeout_ms = config.health_check.timeout_ms,
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

    let targets = Arc::new(SharedTargets::from_config(&config));

    // Keep the watcher alive for the lifetime of the server.
    let _watcher = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            tokio::spawn(targets.clone().follow(updates));
            match watcher.run() {
                Ok(w) => Some(w),
                Err(e) => {
                    tracing::warn!(error = %e, "Config watcher unavailable, targets will not reload");
                    None
                }
            }
        }
        None => None,
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, targets);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
