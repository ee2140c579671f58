//! HTTP API for the shaft sizing engine.
//!
//! Endpoints:
//! - `POST /size` sizes a shaft and returns the result as JSON
//! - `POST /report` sizes a shaft and returns a Markdown report
//! - `GET /fans` lists the fan catalog
//! - `GET /fans/:model` returns one fan with its performance curve

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ReportRequest;
pub use response::{ApiError, ApiErrorResponse, FanSummary};
pub use state::AppState;
