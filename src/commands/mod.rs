pub mod fetch_tickers;
pub mod scan;
pub mod serve;
