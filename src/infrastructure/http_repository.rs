// HTTP repository implementation for the predictive-maintenance backend
use crate::application::maintenance_repository::{MaintenanceRepository, SimulationStatus};
use crate::domain::equipment::{Equipment, FaultRisk, KpiPayload, KpiReport};
use crate::domain::snapshot::{CurrentDataPayload, ForecastPayload, ForecastResult, ParameterSnapshot};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct HttpRepository {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRepository {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn forecast_url(&self, parameter: &str, steps: usize) -> String {
        format!(
            "{}/api/predictions?parameter={}&steps={}",
            self.base_url,
            urlencoding::encode(parameter),
            steps
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Backend request {} failed with status {}: {}", url, status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    async fn post(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .post(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Backend request {} failed with status {}", url, response.status());
        }
        Ok(())
    }
}

#[async_trait]
impl MaintenanceRepository for HttpRepository {
    async fn current_data(&self) -> Result<ParameterSnapshot> {
        let payload: CurrentDataPayload = self.get_json(&self.url("/api/current-data")).await?;
        tracing::debug!(
            "Fetched {} samples for {} parameters",
            payload.timestamps.len(),
            payload.parameters.len()
        );
        Ok(ParameterSnapshot::try_from(payload)?)
    }

    async fn forecast(&self, parameter: &str, steps: usize) -> Result<ForecastResult> {
        let payload: ForecastPayload = self.get_json(&self.forecast_url(parameter, steps)).await?;
        Ok(ForecastResult::try_from(payload)?)
    }

    async fn kpis(&self, equipment: Equipment) -> Result<KpiReport> {
        let url = self.url(&format!("/api/kpis?equipment={}", equipment.code()));
        let payload: KpiPayload = self.get_json(&url).await?;
        Ok(KpiReport::try_from(payload)?)
    }

    async fn fault_risk(&self) -> Result<FaultRisk> {
        self.get_json(&self.url("/api/breakdown-prediction")).await
    }

    async fn simulation_status(&self) -> Result<SimulationStatus> {
        self.get_json(&self.url("/api/simulation/status")).await
    }

    async fn start_simulation(&self) -> Result<()> {
        self.post(&self.url("/api/simulation/start")).await
    }

    async fn stop_simulation(&self) -> Result<()> {
        self.post(&self.url("/api/simulation/stop")).await
    }
}
