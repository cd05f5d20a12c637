// System health scoring from per-parameter deviation
use super::snapshot::ParameterSnapshot;
use super::statistics::SeriesStats;
use serde::Serialize;

/// Health points lost per standard deviation of distance from the mean
const POINTS_PER_SIGMA: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl HealthStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            HealthStatus::Excellent
        } else if score >= 80.0 {
            HealthStatus::Good
        } else if score >= 70.0 {
            HealthStatus::Fair
        } else if score >= 60.0 {
            HealthStatus::Poor
        } else {
            HealthStatus::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "Excellent",
            HealthStatus::Good => "Good",
            HealthStatus::Fair => "Fair",
            HealthStatus::Poor => "Poor",
            HealthStatus::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterHealth {
    pub parameter: String,
    pub latest_value: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub deviation_in_sigma: f64,
    pub score: f64,
}

impl ParameterHealth {
    /// `None` for an empty series
    pub fn score(parameter: &str, values: &[f64]) -> Option<Self> {
        let stats = SeriesStats::compute(values)?;
        let deviation = (stats.latest - stats.mean).abs();
        let deviation_in_sigma = if stats.std_dev > 0.0 {
            deviation / stats.std_dev
        } else {
            0.0
        };

        Some(Self {
            parameter: parameter.to_string(),
            latest_value: stats.latest,
            mean: stats.mean,
            std_dev: stats.std_dev,
            deviation_in_sigma,
            score: (100.0 - deviation_in_sigma * POINTS_PER_SIGMA).max(0.0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemHealth {
    pub overall_score: f64,
    pub status: HealthStatus,
    pub parameters: Vec<ParameterHealth>,
}

impl SystemHealth {
    /// Parameters that are absent or empty are left out of the average.
    /// With nothing to score the result is 0 with an empty parameter list.
    pub fn assess(snapshot: &ParameterSnapshot, parameters: &[String]) -> Self {
        let scored: Vec<ParameterHealth> = parameters
            .iter()
            .filter_map(|name| {
                snapshot
                    .series(name)
                    .and_then(|values| ParameterHealth::score(name, values))
            })
            .collect();

        let overall_score = if scored.is_empty() {
            0.0
        } else {
            scored.iter().map(|p| p.score).sum::<f64>() / scored.len() as f64
        };

        Self {
            overall_score,
            status: HealthStatus::from_score(overall_score),
            parameters: scored,
        }
    }
}
