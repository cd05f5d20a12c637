// Dashboard service - one fetch-then-compute refresh cycle
use crate::application::maintenance_repository::MaintenanceRepository;
use crate::domain::control_limits::ControlChart;
use crate::domain::dashboard::DashboardUpdate;
use crate::domain::equipment::{Equipment, EquipmentRisk, KpiSummary};
use crate::domain::error::{AnalyticsError, AnalyticsResult};
use crate::domain::health::SystemHealth;
use crate::domain::normalizer;
use crate::domain::snapshot::{ForecastResult, ParameterSnapshot};
use crate::domain::table::RecentRecords;
use crate::domain::trend::AlignedTrend;
use crate::infrastructure::config::AnalyticsSettings;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn MaintenanceRepository>,
    settings: AnalyticsSettings,
    kpi_equipment: Equipment,
    forecast_steps: usize,
    /// Shared by every clone so loop and manual refreshes never reuse a number
    cycles: Arc<AtomicU64>,
}

impl DashboardService {
    pub fn new(
        repository: Arc<dyn MaintenanceRepository>,
        settings: AnalyticsSettings,
        kpi_equipment: Equipment,
        forecast_steps: usize,
    ) -> Self {
        Self {
            repository,
            settings,
            kpi_equipment,
            forecast_steps,
            cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn next_cycle(&self) -> u64 {
        self.cycles.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Fetches everything one cycle needs, waits for all of it, then derives
    /// the dashboard. Only a failed current-data fetch fails the cycle; the
    /// other sources degrade to empty results.
    pub async fn refresh(&self, cycle: u64) -> anyhow::Result<DashboardUpdate> {
        let parameter = self.settings.trend_parameter.as_str();

        let (current, forecast, kpis, fault_risk) = futures::join!(
            self.repository.current_data(),
            self.repository.forecast(parameter, self.forecast_steps),
            self.repository.kpis(self.kpi_equipment),
            self.repository.fault_risk(),
        );

        let snapshot = Arc::new(current?);

        let forecast = forecast.unwrap_or_else(|e| {
            tracing::warn!("Forecast for {} unavailable: {:#}", parameter, e);
            ForecastResult::empty()
        });

        let kpis = match kpis {
            Ok(report) => Some(KpiSummary::from(report)),
            Err(e) => {
                tracing::warn!("KPIs for {} unavailable: {:#}", self.kpi_equipment.code(), e);
                None
            }
        };

        let equipment = match fault_risk.and_then(|risk| risk.validate().map_err(anyhow::Error::from)) {
            Ok(risk) => risk.assess(),
            Err(e) => {
                tracing::warn!("Fault risk unavailable: {:#}", e);
                Vec::new()
            }
        };

        let update = self.derive(cycle, snapshot, &forecast, kpis, equipment);

        tracing::debug!(
            "Cycle {}: {} samples, health {:.1} ({})",
            cycle,
            update.snapshot.len(),
            update.health.overall_score,
            update.health.status.label()
        );

        Ok(update)
    }

    fn derive(
        &self,
        cycle: u64,
        snapshot: Arc<ParameterSnapshot>,
        forecast: &ForecastResult,
        kpis: Option<KpiSummary>,
        equipment: Vec<EquipmentRisk>,
    ) -> DashboardUpdate {
        let settings = &self.settings;
        let parameter = settings.trend_parameter.as_str();

        let trend = AlignedTrend::align(parameter, &snapshot, forecast, settings.trend_max_points);
        if let Ok(trend) = &trend {
            if trend.overlaps_history {
                tracing::warn!("Forecast for {} overlaps observed history", parameter);
            }
        }

        DashboardUpdate {
            cycle,
            trend,
            control: ControlChart::build(parameter, &snapshot, settings.control_display_points),
            overview: normalizer::normalize(&snapshot, &settings.radar_parameters),
            health: SystemHealth::assess(&snapshot, &settings.health_parameters),
            kpis,
            equipment,
            records: RecentRecords::build(&snapshot, &settings.table_parameters, settings.table_rows),
            snapshot,
        }
    }

    /// Trend for any parameter, fetched on demand
    pub async fn trend(&self, parameter: &str) -> anyhow::Result<AlignedTrend> {
        let (current, forecast) = futures::join!(
            self.repository.current_data(),
            self.repository.forecast(parameter, self.forecast_steps),
        );
        let snapshot = current?;
        let forecast = forecast?;

        let trend = AlignedTrend::align(
            parameter,
            &snapshot,
            &forecast,
            self.settings.trend_max_points,
        )
        .inspect_err(|e| {
            if matches!(e, AnalyticsError::ParameterNotFound(_)) {
                tracing::warn!("Parameter {} not found in current data", parameter);
            }
        })?;

        Ok(trend)
    }

    pub fn control_chart(
        &self,
        snapshot: &ParameterSnapshot,
        parameter: &str,
    ) -> AnalyticsResult<ControlChart> {
        ControlChart::build(parameter, snapshot, self.settings.control_display_points)
    }

    pub fn repository(&self) -> &Arc<dyn MaintenanceRepository> {
        &self.repository
    }
}
