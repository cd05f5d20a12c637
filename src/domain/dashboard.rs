// Dashboard domain model - derived results of one refresh cycle
use super::control_limits::ControlChart;
use super::equipment::{EquipmentRisk, KpiSummary};
use super::error::AnalyticsResult;
use super::health::SystemHealth;
use super::normalizer::NormalizedVector;
use super::snapshot::ParameterSnapshot;
use super::table::RecentRecords;
use super::trend::AlignedTrend;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DashboardUpdate {
    pub cycle: u64,
    pub snapshot: Arc<ParameterSnapshot>,
    pub trend: AnalyticsResult<AlignedTrend>,
    pub control: AnalyticsResult<ControlChart>,
    pub overview: NormalizedVector,
    pub health: SystemHealth,
    pub kpis: Option<KpiSummary>,
    pub equipment: Vec<EquipmentRisk>,
    pub records: RecentRecords,
}
