// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::presentation::view_state::ViewState;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub view_state: Arc<RwLock<ViewState>>,
}
