// Snapshot domain models - time-aligned parameter series from the backend
use super::error::{AnalyticsError, AnalyticsResult};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const BACKEND_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A sampling instant as sent by the backend: a formatted string or an epoch number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Epoch(f64),
    Text(String),
}

impl Timestamp {
    /// Milliseconds since the epoch, when the timestamp can be interpreted.
    /// Epoch values above 1e11 are taken as milliseconds, smaller ones as seconds.
    pub fn epoch_millis(&self) -> Option<i64> {
        match self {
            Timestamp::Epoch(value) if value.is_finite() => {
                if value.abs() >= 1e11 {
                    Some(*value as i64)
                } else {
                    Some((*value * 1000.0) as i64)
                }
            }
            Timestamp::Epoch(_) => None,
            Timestamp::Text(text) => {
                if let Ok(time) = DateTime::parse_from_rfc3339(text) {
                    return Some(time.timestamp_millis());
                }
                NaiveDateTime::parse_from_str(text, BACKEND_TIME_FORMAT)
                    .ok()
                    .map(|time| time.and_utc().timestamp_millis())
            }
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Epoch(value) => write!(f, "{}", value),
            Timestamp::Text(text) => f.write_str(text),
        }
    }
}

/// Raw current-data payload: `{ timestamps: [...], parameters: { name: [...] } }`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentDataPayload {
    #[serde(default)]
    pub timestamps: Vec<Timestamp>,
    #[serde(default)]
    pub parameters: BTreeMap<String, Vec<f64>>,
}

/// Raw forecast payload: `{ timestamps: [...], predictions: [[name, [...]], ...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    #[serde(default)]
    pub timestamps: Vec<Timestamp>,
    #[serde(default)]
    pub predictions: Vec<(String, Vec<f64>)>,
}

/// One fetched bundle of parameter series sharing a single timestamp axis
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSnapshot {
    timestamps: Vec<Timestamp>,
    parameters: BTreeMap<String, Vec<f64>>,
}

impl ParameterSnapshot {
    /// Every parameter series must be index-aligned with the timestamp axis
    pub fn new(
        timestamps: Vec<Timestamp>,
        parameters: BTreeMap<String, Vec<f64>>,
    ) -> AnalyticsResult<Self> {
        for (name, values) in &parameters {
            if values.len() != timestamps.len() {
                return Err(AnalyticsError::MalformedPayload(format!(
                    "parameter {} has {} samples but snapshot has {} timestamps",
                    name,
                    values.len(),
                    timestamps.len()
                )));
            }
        }

        Ok(Self {
            timestamps,
            parameters,
        })
    }

    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn parameters(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.parameters
    }

    pub fn series(&self, parameter: &str) -> Option<&[f64]> {
        self.parameters.get(parameter).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl TryFrom<CurrentDataPayload> for ParameterSnapshot {
    type Error = AnalyticsError;

    fn try_from(payload: CurrentDataPayload) -> AnalyticsResult<Self> {
        Self::new(payload.timestamps, payload.parameters)
    }
}

/// Predicted series for future instants, produced per request by the backend
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastResult {
    timestamps: Vec<Timestamp>,
    predictions: BTreeMap<String, Vec<f64>>,
}

impl ForecastResult {
    pub fn new(
        timestamps: Vec<Timestamp>,
        predictions: BTreeMap<String, Vec<f64>>,
    ) -> AnalyticsResult<Self> {
        for (name, values) in &predictions {
            if values.len() != timestamps.len() {
                return Err(AnalyticsError::MalformedPayload(format!(
                    "forecast for {} has {} values but {} timestamps",
                    name,
                    values.len(),
                    timestamps.len()
                )));
            }
        }

        Ok(Self {
            timestamps,
            predictions,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn series(&self, parameter: &str) -> Option<&[f64]> {
        self.predictions.get(parameter).map(Vec::as_slice)
    }
}

impl TryFrom<ForecastPayload> for ForecastResult {
    type Error = AnalyticsError;

    fn try_from(payload: ForecastPayload) -> AnalyticsResult<Self> {
        let mut predictions = BTreeMap::new();
        for (name, values) in payload.predictions {
            if predictions.insert(name.clone(), values).is_some() {
                return Err(AnalyticsError::MalformedPayload(format!(
                    "duplicate forecast for {}",
                    name
                )));
            }
        }
        Self::new(payload.timestamps, predictions)
    }
}
