//! Error handling for the Farm Intelligence Pipeline
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::PipelineError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Pipeline errors
    #[error("Prediction failed: {0}")]
    Prediction(#[from] PipelineError),

    // External service errors
    #[error("Weather service unavailable")]
    WeatherServiceUnavailable,

    #[error("AI service error: {0}")]
    AiServiceError(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Validation failure on a single request field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    fn new(code: &str, message: String) -> Self {
        Self {
            code: code.to_string(),
            message,
            field: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Unauthorized { message } => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", message.clone()),
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::Prediction(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("PREDICTION_FAILED", err.to_string()),
            ),
            AppError::WeatherServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new(
                    "WEATHER_SERVICE_UNAVAILABLE",
                    "Weather service is temporarily unavailable".to_string(),
                ),
            ),
            AppError::AiServiceError(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new("AI_SERVICE_ERROR", format!("AI service error: {}", msg)),
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new(
                    "EXTERNAL_SERVICE_ERROR",
                    format!("External service error: {}", msg),
                ),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg)),
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("Location".to_string()), StatusCode::NOT_FOUND),
            (AppError::validation("location", "Location cannot be empty"), StatusCode::BAD_REQUEST),
            (
                AppError::Unauthorized { message: "bad key".to_string() },
                StatusCode::UNAUTHORIZED,
            ),
            (AppError::AiServiceError("timeout".to_string()), StatusCode::BAD_GATEWAY),
            (
                AppError::from(PipelineError::Overflow {
                    crop_id: Uuid::new_v4(),
                    stage: "base yield",
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::WeatherServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (AppError::ExternalService("reset".to_string()), StatusCode::BAD_GATEWAY),
            (
                AppError::Configuration("missing key".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
