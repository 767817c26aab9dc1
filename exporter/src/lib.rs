//! Binsight Exporter
//!
//! This crate provides the Binsight exporter server: a background poll loop
//! that scans the instrument API for dataset freshness and an Axum HTTP
//! server exposing the results as Prometheus gauges.
//!
//! # Architecture
//!
//! - The poll loop lists datasets, runs the freshness scanner over each, and
//!   publishes records into the gauge registry.
//! - The HTTP server exposes `/metrics` for scraping and `/health` for load
//!   balancers.
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use exporter::{run_server, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server(Config::parse()).await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
pub mod metrics;
pub mod poller;
mod routes;
mod state;

pub use config::Config;
pub use state::AppState;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use shared::cache::InMemoryFreshnessCache;
use shared::client::InstrumentApiClient;
use shared::config::ProductTable;
use shared::models::default_timeline_metrics;
use shared::scanner::FreshnessScanner;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::metrics::ExporterMetrics;
use crate::poller::PollWorker;

/// Runs the Binsight exporter with the provided configuration.
///
/// Starts the poll loop in the background and serves the metrics endpoint
/// until a shutdown signal arrives. The inability to bind the metrics
/// endpoint is the only whole-process failure mode; per-dataset scan errors
/// are logged inside the loop and never bubble up here.
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client or gauge registry cannot be built
/// - The server fails to bind to the configured address
/// - A fatal error occurs while serving
pub async fn run_server(config: Config) -> Result<()> {
    let products = ProductTable::default();
    let timeline = default_timeline_metrics();

    let metrics = Arc::new(ExporterMetrics::new(&products, &timeline)?);
    let client = Arc::new(InstrumentApiClient::new(config.base_url.clone())?);
    let scanner = FreshnessScanner::new(
        products,
        InMemoryFreshnessCache::new_shared(),
        config.lookback(),
        config.lag_threshold(),
    );

    let worker = Arc::new(PollWorker::new(
        Arc::clone(&client) as _,
        Arc::clone(&client) as _,
        client as _,
        scanner,
        Arc::clone(&metrics) as _,
        timeline,
        config.poll_interval(),
    ));
    tokio::spawn(worker.run());

    let addr = config.socket_addr();
    tracing::info!(
        base_url = %config.base_url,
        interval = config.interval,
        %addr,
        "Binsight exporter starting"
    );

    let app = create_router(AppState::new(metrics));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Listening for scrapes");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Exporter shutdown complete");
    Ok(())
}

/// Creates the main application router with all routes and middleware.
///
/// This function is public to allow testing the router without starting a
/// full server.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::metrics_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let metrics = Arc::new(ExporterMetrics::new(&ProductTable::default(), &[]).unwrap());
        AppState::new(metrics)
    }

    #[tokio::test]
    async fn test_health_endpoint_returns_200() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_returns_200() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
