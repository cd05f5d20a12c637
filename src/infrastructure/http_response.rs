// HTTP response utilities for JSON errors and CSV downloads
use crate::domain::error::AnalyticsError;
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;

pub fn analytics_status(error: &AnalyticsError) -> StatusCode {
    match error {
        AnalyticsError::ParameterNotFound(_) => StatusCode::NOT_FOUND,
        AnalyticsError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AnalyticsError::MalformedPayload(_) => StatusCode::BAD_GATEWAY,
    }
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response<Body> {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Maps an application error to a status code, looking through to the
/// analytics error when there is one. Anything else is a backend failure.
pub fn anyhow_response(error: &anyhow::Error) -> Response<Body> {
    match error.downcast_ref::<AnalyticsError>() {
        Some(analytics) => error_response(analytics_status(analytics), analytics.to_string()),
        None => {
            tracing::warn!("Backend request failed: {:#}", error);
            error_response(StatusCode::BAD_GATEWAY, format!("{:#}", error))
        }
    }
}

pub fn csv_response(content: String, file_name: &str) -> Result<Response<Body>, StatusCode> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analytics_status() {
        assert_eq!(
            analytics_status(&AnalyticsError::ParameterNotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            analytics_status(&AnalyticsError::InsufficientData("x".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_anyhow_response_downcasts() {
        let error = anyhow::Error::from(AnalyticsError::ParameterNotFound("flow".into()));
        assert_eq!(anyhow_response(&error).status(), StatusCode::NOT_FOUND);

        let error = anyhow::anyhow!("connection refused");
        assert_eq!(anyhow_response(&error).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_csv_response_headers() {
        let response = csv_response("Timestamp\n".to_string(), "data.csv").unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"data.csv\""
        );
    }
}
