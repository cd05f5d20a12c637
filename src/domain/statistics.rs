// Population statistics over a full sample series

/// Summary of one parameter series. The standard deviation uses the
/// population estimator (denominator n).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub latest: f64,
}

impl SeriesStats {
    /// Returns `None` for an empty series
    pub fn compute(values: &[f64]) -> Option<Self> {
        let latest = *values.last()?;
        let count = values.len();
        let n = count as f64;

        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            latest,
        })
    }
}
