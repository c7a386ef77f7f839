//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router: health shim in front of the next stage
//! - Wire up middleware (tracing, request timeout)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, response::IntoResponse, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProbeConfig;
use crate::discovery::TargetProvider;
use crate::health::HealthChecker;
use crate::http::middleware::with_health_check;

/// HTTP server exposing the health endpoint.
pub struct HttpServer {
    router: Router,
    config: ProbeConfig,
}

impl HttpServer {
    /// Create a new HTTP server reading targets from `targets`.
    pub fn new(config: ProbeConfig, targets: Arc<dyn TargetProvider>) -> Self {
        let checker = HealthChecker::new(targets, &config.health_check);
        let router = Self::build_router(&config, checker);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProbeConfig, checker: HealthChecker) -> Router {
        let next = Router::new().fallback(next_stage);
        with_health_check(next, checker)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C or a shutdown broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            probe_timeout_ms = self.config.health_check.timeout_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => tracing::info!("Shutdown signal received"),
                    _ = shutdown.recv() => tracing::info!("Shutdown requested"),
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }
}

/// Stage behind the health shim in the standalone binary.
async fn next_stage() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "No matching route found")
}
