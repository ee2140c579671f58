//! HTTP request handlers for the shaft sizing API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::run_sizing;
use crate::models::SizingInput;
use crate::report::{CsiSpec, SizingReport};

use super::request::ReportRequest;
use super::response::{ApiError, ApiErrorResponse, FanSummary};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/size", post(size_handler))
        .route("/report", post(report_handler))
        .route("/spec", post(spec_handler))
        .route("/fans", get(fans_handler))
        .route("/fans/:model", get(fan_handler))
        .with_state(state)
}

/// Handler for POST /size.
///
/// Sizes the shaft and returns the full [`SizingResult`](crate::models::SizingResult).
async fn size_handler(
    State(state): State<AppState>,
    payload: Result<Json<SizingInput>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing sizing request");

    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    match run_sizing(&input, state.config().config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                floors = input.floor_count(),
                shaft = %result.shaft.label,
                fan = %result.fan.display_model(),
                duration_us = result.audit_trace.duration_us,
                "Sizing completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Sizing failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /report.
///
/// Sizes the shaft and returns the Markdown report.
async fn report_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing report request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let config = state.config().config();
    match run_sizing(&request.input, config) {
        Ok(result) => {
            let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
            let markdown = SizingReport::new(&result, config, date).to_string();
            info!(
                correlation_id = %correlation_id,
                shaft = %result.shaft.label,
                bytes = markdown.len(),
                "Report generated"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
                markdown,
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Report failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /spec.
///
/// Sizes the shaft and returns the CSI Section 23 34 00 specification as
/// Markdown.
async fn spec_handler(
    State(state): State<AppState>,
    payload: Result<Json<SizingInput>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing specification request");

    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let config = state.config().config();
    match run_sizing(&input, config) {
        Ok(result) => {
            let markdown = CsiSpec::new(&result, config).to_string();
            info!(
                correlation_id = %correlation_id,
                shaft = %result.shaft.label,
                controller = %result.controller.model,
                bytes = markdown.len(),
                "Specification generated"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
                markdown,
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Specification failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /fans.
async fn fans_handler(State(state): State<AppState>) -> Json<Vec<FanSummary>> {
    Json(state.config().config().fans().iter().map(FanSummary::from).collect())
}

/// Handler for GET /fans/:model.
///
/// Returns the full catalog entry, including the performance curve.
async fn fan_handler(State(state): State<AppState>, Path(model): Path<String>) -> Response {
    match state.config().get_fan(&model) {
        Ok(spec) => Json(spec.clone()).into_response(),
        Err(err) => {
            warn!(model = %model, "Fan not found");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Turns a JSON extraction failure into a `400` error body.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}
