// Statistical process control limits
use super::error::{AnalyticsError, AnalyticsResult};
use super::snapshot::{ParameterSnapshot, Timestamp};
use super::statistics::SeriesStats;
use serde::Serialize;

const SIGMA_MULTIPLIER: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    InControl,
    OutOfControl,
}

/// Mean and 3-sigma band of one parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlLimits {
    pub mean: f64,
    pub std_dev: f64,
    pub upper_limit: f64,
    pub lower_limit: f64,
}

impl ControlLimits {
    /// Limits over every sample passed in. Callers that display a shorter
    /// window must still pass the full series here.
    pub fn compute(samples: &[f64]) -> AnalyticsResult<Self> {
        let stats = SeriesStats::compute(samples)
            .ok_or_else(|| AnalyticsError::InsufficientData("control limits".to_string()))?;

        Ok(Self {
            mean: stats.mean,
            std_dev: stats.std_dev,
            upper_limit: stats.mean + SIGMA_MULTIPLIER * stats.std_dev,
            lower_limit: stats.mean - SIGMA_MULTIPLIER * stats.std_dev,
        })
    }

    /// A sample sitting exactly on a limit is in control
    pub fn classify(&self, value: f64) -> ControlState {
        if value > self.upper_limit || value < self.lower_limit {
            ControlState::OutOfControl
        } else {
            ControlState::InControl
        }
    }

    pub fn classify_all(&self, samples: &[f64]) -> Vec<ControlState> {
        samples.iter().map(|v| self.classify(*v)).collect()
    }
}

/// Control chart for the most recent samples of a parameter, with limits
/// taken from the whole series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlChart {
    pub parameter: String,
    pub limits: ControlLimits,
    /// 1-based position of each displayed sample in the full series
    pub labels: Vec<usize>,
    pub timestamps: Vec<Timestamp>,
    pub values: Vec<f64>,
    pub states: Vec<ControlState>,
    pub out_of_control: usize,
}

impl ControlChart {
    pub fn build(
        parameter: &str,
        snapshot: &ParameterSnapshot,
        display_points: usize,
    ) -> AnalyticsResult<Self> {
        let series = snapshot
            .series(parameter)
            .ok_or_else(|| AnalyticsError::ParameterNotFound(parameter.to_string()))?;
        let limits = ControlLimits::compute(series)
            .map_err(|_| AnalyticsError::InsufficientData(parameter.to_string()))?;

        let start_index = series.len().saturating_sub(display_points);
        let values = series[start_index..].to_vec();
        let timestamps = snapshot.timestamps()[start_index..].to_vec();
        let labels = (0..values.len()).map(|i| start_index + i + 1).collect();
        let states = limits.classify_all(&values);
        let out_of_control = states
            .iter()
            .filter(|s| **s == ControlState::OutOfControl)
            .count();

        Ok(Self {
            parameter: parameter.to_string(),
            limits,
            labels,
            timestamps,
            values,
            states,
            out_of_control,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn snapshot(name: &str, values: Vec<f64>) -> ParameterSnapshot {
        let timestamps = (0..values.len())
            .map(|i| Timestamp::Epoch(i as f64))
            .collect();
        let mut parameters = BTreeMap::new();
        parameters.insert(name.to_string(), values);
        ParameterSnapshot::new(timestamps, parameters).unwrap()
    }

    #[test]
    fn test_reference_example() {
        let limits = ControlLimits::compute(&[10.0, 10.0, 10.0, 12.0]).unwrap();

        assert!((limits.mean - 10.5).abs() < 1e-9);
        assert!((limits.std_dev - 0.8660254).abs() < 1e-6);
        assert!((limits.upper_limit - 13.0980762).abs() < 1e-6);
        assert!((limits.lower_limit - 7.9019238).abs() < 1e-6);
        assert_eq!(limits.classify(12.0), ControlState::InControl);
        assert_eq!(limits.classify(14.0), ControlState::OutOfControl);
        assert_eq!(limits.classify(7.0), ControlState::OutOfControl);
    }

    #[test]
    fn test_limits_symmetric_around_mean() {
        let limits = ControlLimits::compute(&[3.2, -1.0, 8.5, 4.4, 0.0]).unwrap();

        assert!(limits.lower_limit <= limits.mean && limits.mean <= limits.upper_limit);
        assert!((limits.upper_limit - limits.mean - 3.0 * limits.std_dev).abs() < 1e-9);
        assert!((limits.mean - limits.lower_limit - 3.0 * limits.std_dev).abs() < 1e-9);
    }

    #[test]
    fn test_constant_series_is_in_control() {
        let samples = [7.0; 6];
        let limits = ControlLimits::compute(&samples).unwrap();

        assert_eq!(limits.std_dev, 0.0);
        assert_eq!(limits.upper_limit, 7.0);
        assert_eq!(limits.lower_limit, 7.0);
        assert!(
            limits
                .classify_all(&samples)
                .iter()
                .all(|s| *s == ControlState::InControl)
        );
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        assert!(matches!(
            ControlLimits::compute(&[]),
            Err(AnalyticsError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_chart_uses_full_series_for_limits() {
        let mut values = vec![0.0; 40];
        values.extend([100.0; 10]);
        let snapshot = snapshot("flow", values.clone());

        let chart = ControlChart::build("flow", &snapshot, 5).unwrap();
        let full = ControlLimits::compute(&values).unwrap();

        assert_eq!(chart.limits, full);
        assert_eq!(chart.values, vec![100.0; 5]);
        assert_eq!(chart.labels, vec![46, 47, 48, 49, 50]);
        assert_eq!(chart.timestamps.len(), 5);
        // Against a window-only computation the band would collapse to 100
        assert!(chart.limits.mean < 100.0);
    }

    #[test]
    fn test_chart_counts_out_of_control_points() {
        let mut values = vec![10.0; 30];
        values.push(1000.0);
        let snapshot = snapshot("flow", values);

        let chart = ControlChart::build("flow", &snapshot, 30).unwrap();
        assert_eq!(chart.out_of_control, 1);
        assert_eq!(chart.states.last(), Some(&ControlState::OutOfControl));
        assert_eq!(chart.labels.first(), Some(&2));
    }

    #[test]
    fn test_chart_errors() {
        let snapshot = snapshot("flow", vec![]);
        assert_eq!(
            ControlChart::build("pressure", &snapshot, 30),
            Err(AnalyticsError::ParameterNotFound("pressure".to_string()))
        );
        assert_eq!(
            ControlChart::build("flow", &snapshot, 30),
            Err(AnalyticsError::InsufficientData("flow".to_string()))
        );
    }
}
