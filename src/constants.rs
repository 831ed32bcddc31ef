//! Scan request defaults and exchange mappings.

/// Default result limit when the caller gives none and no ticker
/// allow-list is in play.
pub const DEFAULT_LIMIT: usize = 100;

/// Floor for the auto-computed limit on allow-list scans. A scan for N
/// tickers requests `max(N, TICKER_SCAN_MIN_LIMIT)` rows.
pub const TICKER_SCAN_MIN_LIMIT: usize = 50;

/// Hard cap the downstream service enforces on `limit`.
pub const MAX_LIMIT: usize = 1000;

/// Market the downstream service scans when none is given.
pub const DEFAULT_MARKET: &str = "america";

/// Market selections that name a single exchange rather than a whole
/// market. Selecting one adds an `exchange in [...]` restriction filter.
pub const EXCHANGE_MARKETS: &[&str] = &["NASDAQ", "NYSE", "AMEX"];

/// Exchanges dropped from the ticker universe export (mostly illiquid
/// OTC listings).
pub const EXCLUDED_EXCHANGES: &[&str] = &["OTC"];

/// Row count requested by the ticker universe export. The downstream
/// universe is ~20k symbols.
pub const TICKER_EXPORT_LIMIT: usize = 25000;

/// Column on which the ticker allow-list filter and reconciliation key.
pub const NAME_FIELD: &str = "name";
