use crate::constants::{EXCLUDED_EXCHANGES, TICKER_EXPORT_LIMIT};
use crate::error::{Error, Result};
use crate::models::{ResultRow, ScanRequest};
use crate::services::scan_client::ScanExecutor;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Ticker universe snapshot written to disk. Refreshed daily via cron.
#[derive(Debug, Serialize)]
pub struct TickerUniverse {
    pub updated_at: String,
    pub count: usize,
    pub tickers: Vec<ResultRow>,
}

/// Fetch every listed ticker and write the snapshot JSON to `path`.
pub async fn export_tickers<E: ScanExecutor>(executor: &E, path: &Path) -> Result<TickerUniverse> {
    info!("Fetching ticker universe from scan service");

    let response = executor.scan(&universe_request()).await?;

    info!(
        total_available = response.total_count,
        fetched = response.results.len(),
        "Fetched ticker universe"
    );

    let tickers = drop_excluded(response.results);

    let universe = TickerUniverse {
        updated_at: Utc::now().to_rfc3339(),
        count: tickers.len(),
        tickers,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::Io(format!("Failed to create data directory: {}", e)))?;
    }

    let json = serde_json::to_string_pretty(&universe)
        .map_err(|e| Error::Parse(format!("Failed to serialize tickers: {}", e)))?;
    std::fs::write(path, json)
        .map_err(|e| Error::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    info!(count = universe.count, path = %path.display(), "Saved ticker universe");

    Ok(universe)
}

/// The one scan allowed to run unconstrained: the whole universe, just
/// identification columns. Built directly rather than through the
/// request builder, which refuses filterless scans from callers.
fn universe_request() -> ScanRequest {
    ScanRequest {
        markets: None,
        columns: vec![
            "name".to_string(),
            "description".to_string(),
            "exchange".to_string(),
            "type".to_string(),
        ],
        filters: Vec::new(),
        order_by: None,
        limit: Some(TICKER_EXPORT_LIMIT),
        offset: None,
    }
}

fn drop_excluded(rows: Vec<ResultRow>) -> Vec<ResultRow> {
    let before = rows.len();
    let kept: Vec<ResultRow> = rows
        .into_iter()
        .filter(|row| {
            row.get("exchange")
                .and_then(|value| value.as_str())
                .map(|exchange| !EXCLUDED_EXCHANGES.contains(&exchange))
                .unwrap_or(true)
        })
        .collect();

    if kept.len() < before {
        info!(
            excluded = before - kept.len(),
            exchanges = ?EXCLUDED_EXCHANGES,
            "Dropped excluded exchanges"
        );
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(name: &str, exchange: &str) -> ResultRow {
        json!({ "name": name, "exchange": exchange })
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_universe_request_shape() {
        let request = universe_request();
        assert_eq!(request.columns.len(), 4);
        assert_eq!(request.limit, Some(TICKER_EXPORT_LIMIT));
        assert!(request.filters.is_empty());
    }

    #[test]
    fn test_otc_rows_dropped() {
        let rows = vec![
            row("AAPL", "NASDAQ"),
            row("SKETCHY", "OTC"),
            row("JPM", "NYSE"),
        ];
        let kept = drop_excluded(rows);
        assert_eq!(kept.len(), 2);
        assert!(kept
            .iter()
            .all(|r| r.get("exchange").unwrap().as_str() != Some("OTC")));
    }

    #[test]
    fn test_rows_without_exchange_kept() {
        let rows = vec![json!({ "name": "X" }).as_object().unwrap().clone()];
        assert_eq!(drop_excluded(rows).len(), 1);
    }
}
