use crate::models::Filter;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One result row from the scan service: column name -> value.
pub type ResultRow = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Sort configuration passed through to the scan service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Caller-facing scan configuration: one of these per scan cycle, built
/// fresh from the latest UI state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Markets to scan. A market naming a single exchange (NASDAQ, NYSE,
    /// AMEX) additionally restricts results to that exchange.
    pub markets: Vec<String>,

    /// User-built field filters, in the order the user added them.
    #[serde(default)]
    pub filters: Vec<Filter>,

    /// Optional ticker allow-list. Symbols are matched case-insensitively
    /// and unmatched ones are reported back as not found.
    #[serde(default)]
    pub tickers: Vec<String>,

    /// Columns to retrieve; order is display order and is preserved.
    pub columns: Vec<String>,

    #[serde(rename = "orderBy", default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

/// Wire-level request POSTed to the scan service. `filters` here is the
/// merged list produced by the request builder, not the raw user filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markets: Option<Vec<String>>,

    pub columns: Vec<String>,

    pub filters: Vec<Filter>,

    #[serde(rename = "orderBy", skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

/// Response body from the scan service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    #[serde(rename = "totalCount")]
    pub total_count: u64,

    pub results: Vec<ResultRow>,

    /// ISO timestamp of when the scan was executed (service clock).
    pub timestamp: String,

    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

impl ScanResponse {
    pub fn new(results: Vec<ResultRow>, total_count: u64, duration_ms: u64) -> Self {
        Self {
            total_count,
            results,
            timestamp: Utc::now().to_rfc3339(),
            duration_ms,
        }
    }
}

/// Structured error body the scan service returns with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// A saved screener configuration from the config store, accepted as an
/// opaque `{columns, filters}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedScreenerConfig {
    pub columns: Vec<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl ScanOptions {
    /// Replace columns and filters with a saved configuration, keeping
    /// market, tickers and pagination as-is.
    pub fn apply_saved(&mut self, saved: SavedScreenerConfig) {
        self.columns = saved.columns;
        self.filters = saved.filters;
    }
}
