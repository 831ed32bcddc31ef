use crate::error::{Error, Result};
use crate::models::{ScanRequest, ScanResponse, ServiceErrorBody};
use std::time::Instant;
use tracing::{debug, info, warn};

/// One request/response cycle against the scan service. Implementations
/// do not retry; retry policy lives in the recovery controller.
pub trait ScanExecutor {
    fn scan(
        &self,
        request: &ScanRequest,
    ) -> impl std::future::Future<Output = Result<ScanResponse>> + Send;
}

/// HTTP client for the external scan service.
pub struct ScanClient {
    base_url: String,
    client: reqwest::Client,
}

impl ScanClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "Invalid scan service URL: must start with http:// or https://, got: '{}'",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }
}

impl ScanExecutor for ScanClient {
    async fn scan(&self, request: &ScanRequest) -> Result<ScanResponse> {
        let url = format!("{}/scan", self.base_url);
        let started = Instant::now();

        debug!(
            url = url,
            filter_count = request.filters.len(),
            limit = ?request.limit,
            offset = ?request.offset,
            "Sending scan request"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Scan request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read scan response: {}", e)))?;

        if !status.is_success() {
            let err = classify_failure(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %err, "Scan request failed");
            return Err(err);
        }

        let scan_response: ScanResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Failed to parse scan response: {}", e)))?;

        info!(
            total_count = scan_response.total_count,
            row_count = scan_response.results.len(),
            service_duration_ms = scan_response.duration_ms,
            round_trip_ms = started.elapsed().as_millis() as u64,
            "Scan completed"
        );

        Ok(scan_response)
    }
}

/// Map a non-2xx downstream response onto the error taxonomy: a
/// structured `{error, detail?}` body is a rejection the service chose
/// to explain, anything else is opaque.
fn classify_failure(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(parsed) => Error::Rejected {
            reason: parsed.error,
            detail: parsed.detail,
        },
        Err(_) => Error::UnknownService(format!("status {}: {}", status, truncate(body, 200))),
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_body_becomes_rejection() {
        let err = classify_failure(400, r#"{"error":"offset out of range","detail":"max 120"}"#);
        match err {
            Error::Rejected { reason, detail } => {
                assert_eq!(reason, "offset out of range");
                assert_eq!(detail.as_deref(), Some("max 120"));
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_structured_body_without_detail() {
        let err = classify_failure(422, r#"{"error":"bad filter value"}"#);
        match err {
            Error::Rejected { reason, detail } => {
                assert_eq!(reason, "bad filter value");
                assert_eq!(detail, None);
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_body_is_unknown_service_error() {
        let err = classify_failure(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, Error::UnknownService(_)));

        let err = classify_failure(500, "");
        assert!(matches!(err, Error::UnknownService(_)));
    }

    #[test]
    fn test_all_downstream_failures_are_recoverable() {
        assert!(classify_failure(400, r#"{"error":"x"}"#).is_recoverable());
        assert!(classify_failure(500, "oops").is_recoverable());
        assert!(Error::Transport("timeout".to_string()).is_recoverable());
        assert!(!Error::Validation("empty columns".to_string()).is_recoverable());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(ScanClient::new("ftp://nope"), Err(Error::Config(_))));
        assert!(ScanClient::new("http://localhost:8001/").is_ok());
    }
}
