use crate::error::Error;
use crate::models::{PaginationState, ResultRow, ScanOptions};
use crate::server::AppState;
use crate::services::ScanController;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Request body for `POST /scan`: scan options plus the pagination
/// window expressed as a 1-based page.
#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    #[serde(flatten)]
    pub options: ScanOptions,

    #[serde(default = "default_page")]
    pub page: usize,

    #[serde(rename = "pageSize", default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    crate::constants::DEFAULT_LIMIT
}

/// Response body for `POST /scan`.
#[derive(Debug, Serialize)]
pub struct ScanResult {
    #[serde(rename = "totalCount")]
    pub total_count: u64,

    pub results: Vec<ResultRow>,

    pub timestamp: String,

    #[serde(rename = "durationMs")]
    pub duration_ms: u64,

    /// Requested tickers that produced no row, in requested order.
    /// Empty when the scan had no allow-list.
    #[serde(rename = "notFound")]
    pub not_found: Vec<String>,

    /// Page the results belong to. Differs from the requested page when
    /// the scan was recovered at page 1.
    pub page: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Run one scan cycle: build, execute with pagination recovery,
/// reconcile the allow-list against the rows.
pub async fn scan_handler(
    State(state): State<AppState>,
    Json(query): Json<ScanQuery>,
) -> Response {
    let mut pagination = PaginationState::with_page(query.page, query.page_size);

    info!(
        page = pagination.current_page,
        page_size = pagination.items_per_page,
        filter_count = query.options.filters.len(),
        ticker_count = query.options.tickers.len(),
        "Scan requested"
    );

    let controller = ScanController::new(state.client.as_ref());
    match controller.run(&query.options, &mut pagination).await {
        Ok(outcome) => {
            let body = ScanResult {
                total_count: outcome.response.total_count,
                results: outcome.response.results,
                timestamp: outcome.response.timestamp,
                duration_ms: outcome.response.duration_ms,
                not_found: outcome.reconciliation.not_found,
                page: pagination.current_page,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// One human-readable message per failure, keeping the service-provided
/// detail when there is one.
fn error_response(err: Error) -> Response {
    let status = match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    let detail = err.detail().map(str::to_string);
    let body = ErrorResponse {
        error: err.to_string(),
        detail,
    };
    (status, Json(body)).into_response()
}
