// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::application::poller::{Poller, PollerSettings};
use crate::application::telemetry_api::Credentials;
use crate::infrastructure::config::load_monitor_config;
use crate::infrastructure::http_api::HttpTelemetryApi;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{current_view, health_check, stream_view};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_monitor_config()?;

    // Create the remote API client (infrastructure layer)
    let api = Arc::new(HttpTelemetryApi::new(&config.api.base_url)?);

    // Start the poller (application layer)
    let settings = PollerSettings {
        interval: Duration::from_millis(config.poll.refresh_ms),
        offline_after: Duration::from_millis(config.poll.offline_after_ms),
        history_days: config.poll.history_days,
        history_cap: config.poll.history_points,
        capacity_liters: config.tank.total_volume,
    };
    let credentials = Credentials {
        username: config.api.username.clone(),
        password: config.api.password.clone(),
    };
    let (view, poller) = Poller::spawn(api, settings, config.tank.thresholds(), credentials);

    // Create application state
    let state = Arc::new(AppState { view });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(current_view))
        .route("/dashboard/stream", get(stream_view))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    println!("Starting tank-telemetry monitor on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    poller.stop();
    poller.join().await;
    Ok(())
}
