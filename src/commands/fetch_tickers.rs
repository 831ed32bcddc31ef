use crate::config::Settings;
use crate::error::Result;
use crate::services::{export_tickers, ScanClient};
use std::path::PathBuf;

pub async fn run(output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from("data/tickers.json"));

    let settings = Settings::from_env()?;
    let client = ScanClient::new(&settings.scan_url)?;

    let universe = export_tickers(&client, &path).await?;

    println!("Saved {} tickers to {}", universe.count, path.display());
    Ok(())
}
