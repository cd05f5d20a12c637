// Analytics error kinds
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// A statistic needs at least one sample
    #[error("insufficient data for {0}")]
    InsufficientData(String),

    #[error("parameter {0} not found in snapshot")]
    ParameterNotFound(String),

    /// Shape mismatch in a payload received from the backend
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
