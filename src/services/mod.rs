pub mod controller;
pub mod reconcile;
pub mod request_builder;
pub mod scan_client;
pub mod ticker_export;

pub use controller::{ScanController, ScanOutcome};
pub use reconcile::{reconcile_tickers, ReconciliationResult};
pub use request_builder::build_request;
pub use scan_client::{ScanClient, ScanExecutor};
pub use ticker_export::{export_tickers, TickerUniverse};
