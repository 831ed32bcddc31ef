use crate::error::{Error, Result};

/// Runtime settings, loaded from environment variables with defaults
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Base URL of the downstream scan service.
    pub scan_url: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SCREENER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("SCREENER_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("Invalid SCREENER_PORT: '{}'", raw)))?,
            Err(_) => 8001,
        };

        let scan_url = std::env::var("SCREENER_SCAN_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        Ok(Self {
            host,
            port,
            scan_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        // Env vars are process-global; only assert the defaults when the
        // variables are genuinely absent.
        if std::env::var("SCREENER_PORT").is_err() && std::env::var("SCREENER_HOST").is_err() {
            let settings = Settings::from_env().unwrap();
            assert_eq!(settings.port, 8001);
            assert_eq!(settings.host, "0.0.0.0");
        }
    }
}
