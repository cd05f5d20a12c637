// Repository trait for the predictive-maintenance backend
use crate::domain::equipment::{Equipment, FaultRisk, KpiReport};
use crate::domain::snapshot::{ForecastResult, ParameterSnapshot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Replay progress of the backend's sensor simulation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationStatus {
    pub active: bool,
    #[serde(default)]
    pub current_index: u64,
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub progress: f64,
}

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// All sensor series observed so far
    async fn current_data(&self) -> anyhow::Result<ParameterSnapshot>;

    /// Forecast of the next `steps` samples, requested for `parameter`
    async fn forecast(&self, parameter: &str, steps: usize) -> anyhow::Result<ForecastResult>;

    async fn kpis(&self, equipment: Equipment) -> anyhow::Result<KpiReport>;

    async fn fault_risk(&self) -> anyhow::Result<FaultRisk>;

    async fn simulation_status(&self) -> anyhow::Result<SimulationStatus>;

    async fn start_simulation(&self) -> anyhow::Result<()>;

    async fn stop_simulation(&self) -> anyhow::Result<()>;
}
