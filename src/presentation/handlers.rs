// HTTP request handlers
use crate::domain::parameters;
use crate::domain::table;
use crate::infrastructure::http_response::{
    analytics_status, anyhow_response, csv_response, error_response,
};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

fn not_ready() -> Response {
    error_response(StatusCode::SERVICE_UNAVAILABLE, "no data received from backend yet")
}

/// Latest derived dashboard
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Response {
    let view_state = state.view_state.read().await;
    match view_state.view() {
        Some(view) => Json(view).into_response(),
        None => not_ready(),
    }
}

/// Trend with forecast for any parameter, fetched on demand
pub async fn get_trend(
    Path(parameter): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.dashboard_service.trend(&parameter).await {
        Ok(trend) => Json(json!({
            "title": format!("{} - Trend Analysis", parameters::display_name(&parameter)),
            "trend": trend,
        }))
        .into_response(),
        Err(e) => anyhow_response(&e),
    }
}

/// Control chart for any parameter of the latest snapshot
pub async fn get_control_chart(
    Path(parameter): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(snapshot) = state.view_state.read().await.snapshot() else {
        return not_ready();
    };

    match state.dashboard_service.control_chart(&snapshot, &parameter) {
        Ok(chart) => Json(json!({
            "title": format!("{} - Control Chart", parameters::display_name(&parameter)),
            "chart": chart,
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!("Control chart for {} unavailable: {}", parameter, e);
            error_response(analytics_status(&e), e.to_string())
        }
    }
}

/// Latest snapshot as a CSV download
pub async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let Some(snapshot) = state.view_state.read().await.snapshot() else {
        return not_ready();
    };
    if snapshot.parameters().is_empty() {
        return error_response(StatusCode::NOT_FOUND, "no data available to export");
    }

    let file_name = table::export_file_name(chrono::Utc::now().date_naive());
    match csv_response(table::to_csv(&snapshot), &file_name) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Runs one refresh cycle now and installs it, whatever the simulation state
pub async fn refresh_now(State(state): State<Arc<AppState>>) -> Response {
    let cycle = state.dashboard_service.next_cycle();
    match state.dashboard_service.refresh(cycle).await {
        Ok(update) => {
            state.view_state.write().await.apply(update);
            tracing::info!("Manual refresh installed cycle {}", cycle);
            Json(json!({ "status": "Dashboard refreshed", "cycle": cycle })).into_response()
        }
        Err(e) => anyhow_response(&e),
    }
}

pub async fn get_simulation_status(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.repository().simulation_status().await {
        Ok(status) => Json(status).into_response(),
        Err(e) => anyhow_response(&e),
    }
}

pub async fn start_simulation(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.repository().start_simulation().await {
        Ok(()) => Json(json!({ "status": "Simulation started" })).into_response(),
        Err(e) => anyhow_response(&e),
    }
}

pub async fn stop_simulation(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.repository().stop_simulation().await {
        Ok(()) => Json(json!({ "status": "Simulation stopped" })).into_response(),
        Err(e) => anyhow_response(&e),
    }
}
