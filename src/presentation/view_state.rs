// View state - latest derived dashboard, installed one update at a time
use crate::domain::control_limits::ControlChart;
use crate::domain::dashboard::DashboardUpdate;
use crate::domain::equipment::{EquipmentRisk, KpiSummary};
use crate::domain::error::AnalyticsError;
use crate::domain::health::SystemHealth;
use crate::domain::normalizer::NormalizedVector;
use crate::domain::snapshot::ParameterSnapshot;
use crate::domain::table::RecentRecords;
use crate::domain::trend::AlignedTrend;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub cycle: u64,
    pub updated_at: DateTime<Utc>,
    pub sample_count: usize,
    pub trend: Option<AlignedTrend>,
    pub control: Option<ControlChart>,
    pub overview: NormalizedVector,
    pub health: SystemHealth,
    pub kpis: Option<KpiSummary>,
    pub equipment: Vec<EquipmentRisk>,
    pub records: RecentRecords,
    /// Analytics problems of the latest cycle, for display as warnings
    pub warnings: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ViewState {
    view: Option<DashboardView>,
    snapshot: Option<Arc<ParameterSnapshot>>,
}

impl ViewState {
    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn snapshot(&self) -> Option<Arc<ParameterSnapshot>> {
        self.snapshot.clone()
    }

    /// Replaces the view with the update. A trend that failed because the
    /// parameter is missing leaves the previous trend on display. Updates
    /// older than the installed cycle are ignored; returns whether the
    /// update was installed.
    pub fn apply(&mut self, update: DashboardUpdate) -> bool {
        if let Some(view) = &self.view {
            if update.cycle < view.cycle {
                tracing::debug!(
                    "Ignoring cycle {}, cycle {} already installed",
                    update.cycle,
                    view.cycle
                );
                return false;
            }
        }

        let mut warnings = Vec::new();
        let previous_trend = self.view.take().and_then(|view| view.trend);

        let trend = match update.trend {
            Ok(trend) => Some(trend),
            Err(e @ AnalyticsError::ParameterNotFound(_)) => {
                tracing::warn!("Keeping previous trend: {}", e);
                warnings.push(e.to_string());
                previous_trend
            }
            Err(e) => {
                warnings.push(e.to_string());
                None
            }
        };

        let control = match update.control {
            Ok(chart) => Some(chart),
            Err(e) => {
                warnings.push(e.to_string());
                None
            }
        };

        self.view = Some(DashboardView {
            cycle: update.cycle,
            updated_at: Utc::now(),
            sample_count: update.snapshot.len(),
            trend,
            control,
            overview: update.overview,
            health: update.health,
            kpis: update.kpis,
            equipment: update.equipment,
            records: update.records,
            warnings,
        });
        self.snapshot = Some(update.snapshot);
        true
    }
}

/// Single consumer of the refresh channel
pub async fn consume_updates(
    mut rx: mpsc::Receiver<DashboardUpdate>,
    state: Arc<RwLock<ViewState>>,
) {
    while let Some(update) = rx.recv().await {
        let cycle = update.cycle;
        if state.write().await.apply(update) {
            tracing::debug!("Installed dashboard cycle {}", cycle);
        }
    }
    tracing::info!("Dashboard update channel closed");
}
