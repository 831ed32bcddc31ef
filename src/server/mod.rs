pub mod api;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::services::ScanClient;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<ScanClient>,
}

/// Start the axum gateway server.
pub async fn serve(settings: Settings) -> Result<()> {
    let client = ScanClient::new(&settings.scan_url)?;
    let app_state = AppState {
        client: Arc::new(client),
    };

    // CORS for local frontend dev servers.
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://localhost:5173".parse().unwrap(), // Vite dev server
            "http://127.0.0.1:3000".parse().unwrap(),
            "http://127.0.0.1:5173".parse().unwrap(),
        ])
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    info!(scan_url = settings.scan_url, "Registering routes:");
    info!("  POST /scan");
    info!("  GET /health");

    let app = Router::new()
        .route("/scan", post(api::scan_handler))
        .route("/health", get(api::health_handler))
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .map_err(|e| Error::Config(format!("Invalid listen address: {}", e)))?;
    info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Io(format!("Server error: {}", e)))?;

    Ok(())
}
