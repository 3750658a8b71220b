//! Response layer that decides whether backend error details reach the client.

use crate::error::ErrorReport;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// Rewrites error bodies to include `details` when `expose_error_details` is on.
pub async fn error_details(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if !state.config.expose_error_details {
        return response;
    }
    let report = response
        .extensions()
        .get::<ErrorReport>()
        .filter(|r| r.details.is_some())
        .cloned();
    match report {
        Some(report) => (report.status, Json(report.body(true))).into_response(),
        None => response,
    }
}
