use crate::domain::equipment::Equipment;
use crate::domain::parameters::{
    to_owned_list, DEFAULT_TREND_PARAMETER, HEALTH_PARAMETERS, RADAR_PARAMETERS, TABLE_PARAMETERS,
};
use crate::domain::trend::DEFAULT_MAX_POINTS;
use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    /// One of sp, tk, vp
    pub kpi_equipment: String,
    pub forecast_steps: usize,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            kpi_equipment: "sp".to_string(),
            forecast_steps: 10,
        }
    }
}

impl BackendSettings {
    pub fn equipment(&self) -> anyhow::Result<Equipment> {
        Equipment::parse(&self.kpi_equipment).ok_or_else(|| {
            anyhow::anyhow!(
                "backend.kpi_equipment must be sp, tk or vp, got {:?}",
                self.kpi_equipment
            )
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RefreshSettings {
    pub interval_secs: u64,
    pub channel_capacity: usize,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            channel_capacity: 16,
        }
    }
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalyticsSettings {
    pub trend_parameter: String,
    pub trend_max_points: usize,
    pub control_display_points: usize,
    pub table_rows: usize,
    pub radar_parameters: Vec<String>,
    pub health_parameters: Vec<String>,
    pub table_parameters: Vec<String>,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            trend_parameter: DEFAULT_TREND_PARAMETER.to_string(),
            trend_max_points: DEFAULT_MAX_POINTS,
            control_display_points: 30,
            table_rows: 15,
            radar_parameters: to_owned_list(&RADAR_PARAMETERS),
            health_parameters: to_owned_list(&HEALTH_PARAMETERS),
            table_parameters: to_owned_list(&TABLE_PARAMETERS),
        }
    }
}

impl DashboardConfig {
    /// Rejects settings the refresh cycle cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        self.backend.equipment()?;
        if self.analytics.trend_max_points == 0 {
            anyhow::bail!("analytics.trend_max_points must be at least 1");
        }
        Ok(())
    }
}

/// Parameter lists that may be given as comma-separated env values
const LIST_KEYS: [&str; 3] = [
    "analytics.radar_parameters",
    "analytics.health_parameters",
    "analytics.table_parameters",
];

fn environment() -> config::Environment {
    let environment = config::Environment::with_prefix("DASHBOARD")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",");

    LIST_KEYS
        .iter()
        .fold(environment, |environment, key| environment.with_list_parse_key(key))
}

fn finish(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<DashboardConfig> {
    let config: DashboardConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Built-in defaults, overridden by `config/dashboard.toml` when present,
/// overridden by `DASHBOARD__SECTION__KEY` environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    finish(
        config::Config::builder()
            .add_source(config::File::with_name("config/dashboard").required(false))
            .add_source(environment()),
    )
}

#[cfg(test)]
fn parse_dashboard_config(toml: &str) -> anyhow::Result<DashboardConfig> {
    finish(
        config::Config::builder().add_source(config::File::from_str(toml, config::FileFormat::Toml)),
    )
}
