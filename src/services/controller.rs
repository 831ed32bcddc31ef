use crate::error::Result;
use crate::models::{PaginationState, ScanOptions, ScanResponse};
use crate::services::reconcile::{reconcile_tickers, ReconciliationResult};
use crate::services::request_builder::build_request;
use crate::services::scan_client::ScanExecutor;
use tracing::{info, warn};

/// Final result of one scan cycle.
#[derive(Debug)]
pub struct ScanOutcome {
    pub response: ScanResponse,
    /// Reconciliation against the requested allow-list; empty when the
    /// scan had no allow-list.
    pub reconciliation: ReconciliationResult,
}

/// Runs one scan cycle with a single layer of pagination recovery.
///
/// The downstream service rejects requests whose offset lands past the
/// available result count, which happens when filters are narrowed after
/// the user paged forward. The filters are legitimate; only the stale
/// page number is wrong. So a failed scan on page > 1 is retried exactly
/// once at page 1 with the same options, and the caller's
/// `PaginationState` is snapped back so the UI reflects the corrected
/// page. A failure on page 1 is final — nothing suggests an offset
/// problem there. No second retry is ever attempted.
///
/// One controller instance serves one cycle and is then discarded.
pub struct ScanController<'a, E: ScanExecutor> {
    executor: &'a E,
}

impl<'a, E: ScanExecutor> ScanController<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Execute one scan for the current page, recovering at page 1 if
    /// the first attempt fails beyond page 1. Reconciliation runs once,
    /// against whichever response ends the cycle.
    pub async fn run(
        &self,
        options: &ScanOptions,
        pagination: &mut PaginationState,
    ) -> Result<ScanOutcome> {
        let response = match self.attempt(options, *pagination).await {
            Ok(response) => response,
            Err(err) if err.is_recoverable() && pagination.current_page > 1 => {
                warn!(
                    page = pagination.current_page,
                    error = %err,
                    "Scan failed beyond page 1, retrying at page 1"
                );
                pagination.reset_to_first_page();
                self.attempt(options, *pagination).await?
            }
            Err(err) => return Err(err),
        };

        info!(
            page = pagination.current_page,
            total_count = response.total_count,
            row_count = response.results.len(),
            "Scan cycle finished"
        );

        let reconciliation = reconcile_tickers(&options.tickers, &response.results);

        Ok(ScanOutcome {
            response,
            reconciliation,
        })
    }

    /// One build + execute pass for the given pagination window. The
    /// builder validates before anything reaches the executor.
    async fn attempt(
        &self,
        options: &ScanOptions,
        pagination: PaginationState,
    ) -> Result<ScanResponse> {
        let mut effective = options.clone();
        effective.offset = Some(pagination.offset());
        // Allow-list scans size their own window from the ticker count;
        // everything else pages by the UI's page size.
        if effective.limit.is_none() && effective.tickers.is_empty() {
            effective.limit = Some(pagination.items_per_page);
        }

        let request = build_request(&effective)?;
        self.executor.scan(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{Filter, FilterOp, FilterValue, ScanRequest};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Executor fed a script of outcomes, recording every request.
    struct ScriptedExecutor {
        script: Mutex<VecDeque<Result<ScanResponse>>>,
        calls: Mutex<Vec<ScanRequest>>,
    }

    impl ScriptedExecutor {
        fn new(script: Vec<Result<ScanResponse>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn call(&self, index: usize) -> ScanRequest {
            self.calls.lock().unwrap()[index].clone()
        }
    }

    impl ScanExecutor for ScriptedExecutor {
        async fn scan(&self, request: &ScanRequest) -> Result<ScanResponse> {
            self.calls.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("executor called more times than scripted")
        }
    }

    fn response_with(names: &[&str]) -> ScanResponse {
        let results = names
            .iter()
            .map(|name| {
                json!({ "name": name, "close": 10.0 })
                    .as_object()
                    .unwrap()
                    .clone()
            })
            .collect();
        ScanResponse::new(results, names.len() as u64, 25)
    }

    fn rejected() -> Error {
        Error::Rejected {
            reason: "offset out of range".to_string(),
            detail: None,
        }
    }

    fn options() -> ScanOptions {
        ScanOptions {
            markets: vec!["america".to_string()],
            filters: vec![Filter::new(
                "close",
                FilterOp::Gte,
                FilterValue::number(10.0),
            )],
            tickers: Vec::new(),
            columns: vec!["name".to_string(), "close".to_string()],
            order_by: None,
            limit: None,
            offset: None,
        }
    }

    #[tokio::test]
    async fn test_success_on_first_attempt_keeps_page() {
        let executor = ScriptedExecutor::new(vec![Ok(response_with(&["AAPL"]))]);
        let mut pagination = PaginationState::with_page(2, 25);

        let outcome = ScanController::new(&executor)
            .run(&options(), &mut pagination)
            .await
            .unwrap();

        assert_eq!(executor.call_count(), 1);
        assert_eq!(pagination.current_page, 2);
        assert_eq!(executor.call(0).offset, Some(25));
        assert_eq!(outcome.response.results.len(), 1);
    }

    #[tokio::test]
    async fn test_retries_once_at_page_one_and_corrects_state() {
        let executor =
            ScriptedExecutor::new(vec![Err(rejected()), Ok(response_with(&["AAPL"]))]);
        let mut pagination = PaginationState::with_page(3, 25);

        let outcome = ScanController::new(&executor)
            .run(&options(), &mut pagination)
            .await
            .unwrap();

        assert_eq!(executor.call_count(), 2);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(outcome.response.total_count, 1);

        // First attempt carried the stale offset, the retry dropped it.
        let first = executor.call(0);
        let second = executor.call(1);
        assert_eq!(first.offset, Some(50));
        assert_eq!(second.offset, None);

        // Everything except the offset is unchanged.
        assert_eq!(first.filters, second.filters);
        assert_eq!(first.columns, second.columns);
        assert_eq!(first.markets, second.markets);
        assert_eq!(first.limit, second.limit);
    }

    #[tokio::test]
    async fn test_no_retry_on_page_one() {
        let executor = ScriptedExecutor::new(vec![Err(rejected())]);
        let mut pagination = PaginationState::with_page(1, 25);

        let result = ScanController::new(&executor)
            .run(&options(), &mut pagination)
            .await;

        assert_eq!(executor.call_count(), 1);
        assert!(matches!(result, Err(Error::Rejected { .. })));
        assert_eq!(pagination.current_page, 1);
    }

    #[tokio::test]
    async fn test_no_second_retry() {
        let executor = ScriptedExecutor::new(vec![Err(rejected()), Err(rejected())]);
        let mut pagination = PaginationState::with_page(3, 25);

        let result = ScanController::new(&executor)
            .run(&options(), &mut pagination)
            .await;

        assert_eq!(executor.call_count(), 2);
        assert!(matches!(result, Err(Error::Rejected { .. })));
        // The page reset from the retry transition is kept.
        assert_eq!(pagination.current_page, 1);
    }

    #[tokio::test]
    async fn test_transport_and_unknown_errors_also_trigger_recovery() {
        for err in [
            Error::Transport("connection refused".to_string()),
            Error::UnknownService("status 502".to_string()),
        ] {
            let executor = ScriptedExecutor::new(vec![Err(err), Ok(response_with(&["AAPL"]))]);
            let mut pagination = PaginationState::with_page(2, 50);

            ScanController::new(&executor)
                .run(&options(), &mut pagination)
                .await
                .unwrap();

            assert_eq!(executor.call_count(), 2);
            assert_eq!(pagination.current_page, 1);
        }
    }

    #[tokio::test]
    async fn test_validation_failure_never_calls_executor() {
        let executor = ScriptedExecutor::new(vec![]);
        let mut pagination = PaginationState::with_page(1, 25);

        let mut unconstrained = options();
        unconstrained.filters.clear();

        let result = ScanController::new(&executor)
            .run(&unconstrained, &mut pagination)
            .await;

        assert_eq!(executor.call_count(), 0);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_reconciliation_runs_against_final_response_only() {
        // First attempt fails; reconciliation must see the retry result.
        let executor =
            ScriptedExecutor::new(vec![Err(rejected()), Ok(response_with(&["AAPL"]))]);
        let mut pagination = PaginationState::with_page(2, 25);

        let mut with_tickers = options();
        with_tickers.filters.clear();
        with_tickers.tickers = vec!["aapl".to_string(), "ZZZZZ".to_string()];

        let outcome = ScanController::new(&executor)
            .run(&with_tickers, &mut pagination)
            .await
            .unwrap();

        assert_eq!(outcome.reconciliation.not_found, vec!["ZZZZZ".to_string()]);
        assert!(outcome.reconciliation.valid_tickers.contains("AAPL"));
    }

    #[tokio::test]
    async fn test_allow_list_scan_end_to_end() {
        // Two tickers, no explicit limit: window of 50, allow-list filter
        // only, one ticker missing from the results.
        let executor = ScriptedExecutor::new(vec![Ok(response_with(&["AAPL"]))]);
        let mut pagination = PaginationState::new(25);

        let mut with_tickers = options();
        with_tickers.filters.clear();
        with_tickers.tickers = vec!["AAPL".to_string(), "ZZZZZ".to_string()];

        let outcome = ScanController::new(&executor)
            .run(&with_tickers, &mut pagination)
            .await
            .unwrap();

        let request = executor.call(0);
        assert_eq!(request.limit, Some(50));
        assert_eq!(
            request.filters,
            vec![Filter::new(
                "name",
                FilterOp::In,
                FilterValue::texts(&["AAPL", "ZZZZZ"])
            )]
        );
        assert_eq!(outcome.reconciliation.not_found, vec!["ZZZZZ".to_string()]);
    }

    #[tokio::test]
    async fn test_scan_without_allow_list_reports_nothing_missing() {
        let executor = ScriptedExecutor::new(vec![Ok(response_with(&["AAPL", "MSFT"]))]);
        let mut pagination = PaginationState::new(25);

        let outcome = ScanController::new(&executor)
            .run(&options(), &mut pagination)
            .await
            .unwrap();

        assert!(outcome.reconciliation.not_found.is_empty());
        assert!(outcome.reconciliation.valid_tickers.is_empty());
    }
}
