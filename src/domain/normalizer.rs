// Min-max normalization of latest values for the multi-parameter overview
use super::snapshot::ParameterSnapshot;
use super::statistics::SeriesStats;
use serde::Serialize;

/// Midpoint reported for a flat series
const FLAT_SERIES_VALUE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedVector {
    pub parameters: Vec<String>,
    pub values: Vec<f64>,
}

/// Position of a series' latest value within its own [min, max] range
pub fn normalize_latest(values: &[f64]) -> f64 {
    let Some(stats) = SeriesStats::compute(values) else {
        return 0.0;
    };

    let normalized = if stats.max > stats.min {
        (stats.latest - stats.min) / (stats.max - stats.min)
    } else {
        FLAT_SERIES_VALUE
    };
    normalized.clamp(0.0, 1.0)
}

/// One value per requested parameter, in the requested order. Absent or
/// empty parameters map to 0.
pub fn normalize(snapshot: &ParameterSnapshot, parameters: &[String]) -> NormalizedVector {
    let values = parameters
        .iter()
        .map(|name| snapshot.series(name).map(normalize_latest).unwrap_or(0.0))
        .collect();

    NormalizedVector {
        parameters: parameters.to_vec(),
        values,
    }
}
