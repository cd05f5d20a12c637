// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::refresh_service::RefreshService;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_repository::HttpRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    export_csv, get_control_chart, get_dashboard, get_simulation_status, get_trend, health_check,
    refresh_now, start_simulation, stop_simulation,
};
use crate::presentation::view_state::{consume_updates, ViewState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let kpi_equipment = config.backend.equipment()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpRepository::new(config.backend.base_url.clone()));

    // Create services (application layer)
    let dashboard_service = DashboardService::new(
        repository,
        config.analytics.clone(),
        kpi_equipment,
        config.backend.forecast_steps,
    );
    let refresh_service = RefreshService::new(
        dashboard_service.clone(),
        config.refresh.interval(),
        config.refresh.channel_capacity,
    );

    // Start the refresh loop and its single consumer
    let view_state = Arc::new(RwLock::new(ViewState::default()));
    let (refresh_handle, updates) = refresh_service.spawn();
    tokio::spawn(consume_updates(updates, view_state.clone()));

    let state = Arc::new(AppState {
        dashboard_service,
        view_state,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/trend/:parameter", get(get_trend))
        .route("/control/:parameter", get(get_control_chart))
        .route("/export.csv", get(export_csv))
        .route("/refresh", post(refresh_now))
        .route("/simulation/status", get(get_simulation_status))
        .route("/simulation/start", post(start_simulation))
        .route("/simulation/stop", post(stop_simulation))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind_address.parse()?;
    tracing::info!(
        "Starting maintenance-dashboard on {} (backend {}, refresh every {}s)",
        addr,
        config.backend.base_url,
        config.refresh.interval().as_secs()
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    refresh_handle.stop();
    refresh_handle.join().await;

    Ok(())
}
