use crate::constants::{
    DEFAULT_LIMIT, EXCHANGE_MARKETS, MAX_LIMIT, NAME_FIELD, TICKER_SCAN_MIN_LIMIT,
};
use crate::error::{Error, Result};
use crate::models::{Filter, FilterOp, FilterValue, ScanOptions, ScanRequest};
use tracing::debug;

/// Build the wire-level `ScanRequest` for one scan cycle.
///
/// Merge order matters: downstream evaluation is AND-of-all-filters, but
/// the order is kept deterministic for log readability and testing —
/// user filters first (insertion order), then the exchange restriction
/// implied by the market selection, then the ticker allow-list filter.
pub fn build_request(options: &ScanOptions) -> Result<ScanRequest> {
    if options.columns.is_empty() {
        return Err(Error::Validation("columns must not be empty".to_string()));
    }
    if options.markets.is_empty() {
        return Err(Error::Validation("markets must not be empty".to_string()));
    }
    if options.filters.is_empty() && options.tickers.is_empty() {
        return Err(Error::Validation(
            "refusing to scan an entire market with no filters and no tickers".to_string(),
        ));
    }

    for filter in &options.filters {
        filter.validate()?;
    }

    let mut filters = options.filters.clone();

    let exchanges = exchange_restriction(&options.markets);
    if !exchanges.is_empty() {
        filters.push(Filter::new(
            "exchange",
            FilterOp::In,
            FilterValue::texts(&exchanges),
        ));
    }

    if !options.tickers.is_empty() {
        filters.push(Filter::new(
            NAME_FIELD,
            FilterOp::In,
            FilterValue::texts(&options.tickers),
        ));
    }

    let limit = effective_limit(options);
    let offset = options.offset.filter(|&o| o > 0);

    debug!(
        filter_count = filters.len(),
        limit = limit,
        offset = ?offset,
        "Built scan request"
    );

    Ok(ScanRequest {
        markets: Some(options.markets.clone()),
        columns: options.columns.clone(),
        filters,
        order_by: options.order_by.clone(),
        limit: Some(limit),
        offset,
    })
}

/// Markets naming a single exchange (e.g. "nasdaq") become an
/// `exchange in [...]` filter; broad markets (e.g. "america") do not.
fn exchange_restriction(markets: &[String]) -> Vec<String> {
    markets
        .iter()
        .map(|m| m.to_uppercase())
        .filter(|m| EXCHANGE_MARKETS.contains(&m.as_str()))
        .collect()
}

/// An allow-list scan requests enough rows to cover every ticker, with a
/// floor so short lists still share one window; otherwise the default
/// applies. Capped at the downstream hard limit.
fn effective_limit(options: &ScanOptions) -> usize {
    let limit = match options.limit {
        Some(limit) => limit,
        None if !options.tickers.is_empty() => options.tickers.len().max(TICKER_SCAN_MIN_LIMIT),
        None => DEFAULT_LIMIT,
    };
    limit.min(MAX_LIMIT)
}
