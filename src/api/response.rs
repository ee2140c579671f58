//! Response types for the shaft sizing API.
//!
//! This module defines the fan catalog summary, the error body and the
//! mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::config::FanSpec;
use crate::error::EngineError;

/// One fan in the `/fans` catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanSummary {
    /// Catalog model.
    pub model: String,
    /// Free-air airflow (CFM).
    pub max_cfm: f64,
    /// Highest static pressure on the curve (in. WC).
    pub max_sp: f64,
    /// Supply voltage and phase.
    pub voltage: String,
    /// Motor horsepower.
    pub hp: String,
    /// Motor type.
    pub motor: String,
    /// Impeller type.
    pub impeller: String,
}

impl From<&FanSpec> for FanSummary {
    fn from(spec: &FanSpec) -> Self {
        Self {
            model: spec.model.clone(),
            max_cfm: spec.curve.first().map_or(0.0, |p| p.cfm),
            max_sp: spec.curve.last().map_or(0.0, |p| p.sp),
            voltage: spec.voltage.clone(),
            hp: spec.hp.clone(),
            motor: spec.motor.clone(),
            impeller: spec.impeller.clone(),
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A `400 Bad Request` with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::FanNotFound { model } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "FAN_NOT_FOUND",
                    format!("Fan model not found: {}", model),
                    "The model is not in the equipment catalog",
                ),
            },
            EngineError::UnknownSubductSize { size } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Unknown subduct size: {}\"", size),
                    "The subduct size has no area deduction in the catalog",
                ),
            },
            EngineError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Invalid input '{}': {}", field, message),
                    field,
                ),
            },
            EngineError::NoViableShaft { reason } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "NO_VIABLE_SHAFT",
                    "No viable shaft size",
                    reason,
                ),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}
