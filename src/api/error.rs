use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::GridError;

/// API error types that can be returned from handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("No regions provided")]
    EmptyInput,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("ML forecast error: {0}")]
    ForecastError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Error response that gets serialized to JSON
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRegion(_) | ApiError::EmptyInput | ApiError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ForecastError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::InvalidRegion(_) => "InvalidRegion",
            ApiError::EmptyInput => "EmptyInput",
            ApiError::ValidationError(_) => "ValidationError",
            ApiError::ForecastError(_) => "ForecastError",
            ApiError::InternalError(_) => "InternalServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        let message = match &self {
            ApiError::ForecastError(_) | ApiError::InternalError(_) => {
                tracing::error!(error = %self, "API error occurred");
                "An internal error occurred".to_string()
            }
            _ => {
                tracing::debug!(error = %self, "Client error");
                self.to_string()
            }
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<GridError> for ApiError {
    fn from(error: GridError) -> Self {
        match error {
            GridError::InvalidRegion(region) => ApiError::InvalidRegion(region),
            GridError::EmptyInput => ApiError::EmptyInput,
            GridError::Validation(msg) => ApiError::ValidationError(msg),
            e @ (GridError::UnknownRegionModel(_) | GridError::Forecast { .. }) => {
                ApiError::ForecastError(format!("{e:#}"))
            }
        }
    }
}
