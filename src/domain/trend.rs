// Historical vs. forecast series alignment for dual-line trend charts
use super::error::{AnalyticsError, AnalyticsResult};
use super::snapshot::{ForecastResult, ParameterSnapshot, Timestamp};
use serde::Serialize;

pub const DEFAULT_MAX_POINTS: usize = 50;

/// Two value series on one shared time axis. `None` marks a point that
/// the corresponding line does not draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedTrend {
    pub parameter: String,
    pub timestamps: Vec<Timestamp>,
    pub historical: Vec<Option<f64>>,
    pub predicted: Vec<Option<f64>>,
    /// Forecast does not start strictly after the last observation
    pub overlaps_history: bool,
}

impl AlignedTrend {
    /// Aligns the last `max_points` observations with the last `max_points`
    /// forecast values. The predicted line repeats the last observed value
    /// so both lines meet at the boundary. A forecast without the parameter
    /// is treated as empty.
    pub fn align(
        parameter: &str,
        history: &ParameterSnapshot,
        forecast: &ForecastResult,
        max_points: usize,
    ) -> AnalyticsResult<Self> {
        let observed = history
            .series(parameter)
            .ok_or_else(|| AnalyticsError::ParameterNotFound(parameter.to_string()))?;
        let predicted = forecast.series(parameter).unwrap_or(&[]);
        let predicted_timestamps = if predicted.is_empty() {
            &[][..]
        } else {
            forecast.timestamps()
        };

        Self::align_series(
            parameter,
            observed,
            history.timestamps(),
            predicted,
            predicted_timestamps,
            max_points,
        )
    }

    pub fn align_series(
        parameter: &str,
        observed: &[f64],
        observed_timestamps: &[Timestamp],
        predicted: &[f64],
        predicted_timestamps: &[Timestamp],
        max_points: usize,
    ) -> AnalyticsResult<Self> {
        if observed.len() != observed_timestamps.len() {
            return Err(AnalyticsError::MalformedPayload(format!(
                "history for {} has {} values but {} timestamps",
                parameter,
                observed.len(),
                observed_timestamps.len()
            )));
        }
        if predicted.len() != predicted_timestamps.len() {
            return Err(AnalyticsError::MalformedPayload(format!(
                "forecast for {} has {} values but {} timestamps",
                parameter,
                predicted.len(),
                predicted_timestamps.len()
            )));
        }

        let observed = tail(observed, max_points);
        let observed_timestamps = tail(observed_timestamps, max_points);
        let predicted = tail(predicted, max_points);
        let predicted_timestamps = tail(predicted_timestamps, max_points);

        let anchor = *observed
            .last()
            .ok_or_else(|| AnalyticsError::InsufficientData(parameter.to_string()))?;

        let mut timestamps = Vec::with_capacity(observed.len() + predicted.len());
        timestamps.extend_from_slice(observed_timestamps);
        timestamps.extend_from_slice(predicted_timestamps);

        let mut historical: Vec<Option<f64>> = observed.iter().copied().map(Some).collect();
        historical.resize(observed.len() + predicted.len(), None);

        let mut predicted_line = vec![None; observed.len() - 1];
        predicted_line.push(Some(anchor));
        predicted_line.extend(predicted.iter().copied().map(Some));

        let overlaps_history = match (
            observed_timestamps.last().and_then(Timestamp::epoch_millis),
            predicted_timestamps.first().and_then(Timestamp::epoch_millis),
        ) {
            (Some(last_observed), Some(first_predicted)) => first_predicted <= last_observed,
            _ => false,
        };

        Ok(Self {
            parameter: parameter.to_string(),
            timestamps,
            historical,
            predicted: predicted_line,
            overlaps_history,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

fn tail<T>(items: &[T], max_points: usize) -> &[T] {
    &items[items.len().saturating_sub(max_points)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn epochs(range: std::ops::Range<usize>) -> Vec<Timestamp> {
        range.map(|i| Timestamp::Epoch(i as f64)).collect()
    }

    fn history(values: Vec<f64>) -> ParameterSnapshot {
        let mut parameters = BTreeMap::new();
        let timestamps = epochs(0..values.len());
        parameters.insert("flow".to_string(), values);
        ParameterSnapshot::new(timestamps, parameters).unwrap()
    }

    fn forecast(start: usize, values: Vec<f64>) -> ForecastResult {
        let mut predictions = BTreeMap::new();
        let timestamps = epochs(start..start + values.len());
        predictions.insert("flow".to_string(), values);
        ForecastResult::new(timestamps, predictions).unwrap()
    }

    #[test]
    fn test_align_pads_and_connects() {
        let trend = AlignedTrend::align(
            "flow",
            &history(vec![1.0, 2.0, 3.0]),
            &forecast(3, vec![4.0, 5.0]),
            DEFAULT_MAX_POINTS,
        )
        .unwrap();

        assert_eq!(trend.timestamps, epochs(0..5));
        assert_eq!(
            trend.historical,
            vec![Some(1.0), Some(2.0), Some(3.0), None, None]
        );
        assert_eq!(
            trend.predicted,
            vec![None, None, Some(3.0), Some(4.0), Some(5.0)]
        );
        assert!(!trend.overlaps_history);
    }

    #[test]
    fn test_align_truncates_each_side_independently() {
        let observed: Vec<f64> = (0..80).map(|i| i as f64).collect();
        let predicted: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();

        let trend =
            AlignedTrend::align("flow", &history(observed), &forecast(80, predicted), 50).unwrap();

        assert_eq!(trend.len(), 100);
        assert_eq!(trend.historical.len(), 100);
        assert_eq!(trend.predicted.len(), 100);
        assert_eq!(trend.timestamps.first(), Some(&Timestamp::Epoch(30.0)));
        assert_eq!(trend.timestamps[50], Timestamp::Epoch(90.0));
        assert_eq!(trend.historical[49], Some(79.0));
        assert_eq!(trend.historical[50], None);
        assert_eq!(trend.predicted[48], None);
        assert_eq!(trend.predicted[49], Some(79.0));
        assert_eq!(trend.predicted[50], Some(110.0));
    }

    #[test]
    fn test_align_with_empty_forecast() {
        let trend = AlignedTrend::align(
            "flow",
            &history(vec![4.0, 8.0, 6.0]),
            &ForecastResult::empty(),
            DEFAULT_MAX_POINTS,
        )
        .unwrap();

        assert_eq!(trend.historical, vec![Some(4.0), Some(8.0), Some(6.0)]);
        assert_eq!(trend.predicted, vec![None, None, Some(6.0)]);
        assert_eq!(trend.len(), 3);
    }

    #[test]
    fn test_single_observation_connects_without_padding() {
        let trend = AlignedTrend::align(
            "flow",
            &history(vec![9.0]),
            &forecast(1, vec![10.0]),
            DEFAULT_MAX_POINTS,
        )
        .unwrap();

        assert_eq!(trend.historical, vec![Some(9.0), None]);
        assert_eq!(trend.predicted, vec![Some(9.0), Some(10.0)]);
    }

    #[test]
    fn test_missing_parameter_and_empty_history() {
        assert_eq!(
            AlignedTrend::align(
                "pressure",
                &history(vec![1.0]),
                &ForecastResult::empty(),
                DEFAULT_MAX_POINTS
            ),
            Err(AnalyticsError::ParameterNotFound("pressure".to_string()))
        );
        assert_eq!(
            AlignedTrend::align(
                "flow",
                &history(vec![]),
                &forecast(0, vec![1.0]),
                DEFAULT_MAX_POINTS
            ),
            Err(AnalyticsError::InsufficientData("flow".to_string()))
        );
    }

    #[test]
    fn test_overlapping_forecast_is_flagged_not_reordered() {
        let trend = AlignedTrend::align(
            "flow",
            &history(vec![1.0, 2.0, 3.0]),
            &forecast(1, vec![7.0]),
            DEFAULT_MAX_POINTS,
        )
        .unwrap();

        assert!(trend.overlaps_history);
        assert_eq!(trend.timestamps[3], Timestamp::Epoch(1.0));
    }

    #[test]
    fn test_align_series_rejects_mismatched_lengths() {
        let result = AlignedTrend::align_series(
            "flow",
            &[1.0, 2.0],
            &epochs(0..1),
            &[],
            &[],
            DEFAULT_MAX_POINTS,
        );
        assert!(matches!(result, Err(AnalyticsError::MalformedPayload(_))));
    }
}
