use crate::config::Settings;
use crate::error::Result;
use crate::server;
use tracing::info;

pub async fn run(port: Option<u16>) -> Result<()> {
    let mut settings = Settings::from_env()?;
    if let Some(port) = port {
        settings.port = port;
    }

    info!(
        host = settings.host,
        port = settings.port,
        scan_url = settings.scan_url,
        "Starting tvscan gateway"
    );

    server::serve(settings).await
}
