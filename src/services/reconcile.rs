use crate::constants::NAME_FIELD;
use crate::models::ResultRow;
use std::collections::HashSet;

/// Outcome of matching a requested ticker allow-list against one scan
/// response. Recomputed on every allow-list scan, never carried across
/// cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// Uppercased symbols that did appear in the results.
    pub valid_tickers: HashSet<String>,
    /// Requested tickers with no matching row, in requested order and
    /// original casing.
    pub not_found: Vec<String>,
}

impl ReconciliationResult {
    fn not_applicable() -> Self {
        Self {
            valid_tickers: HashSet::new(),
            not_found: Vec::new(),
        }
    }
}

/// Compare a requested ticker allow-list against the `name` column of
/// the result rows, case-insensitively. An empty request list means the
/// scan had no allow-list, so nothing is reported missing.
pub fn reconcile_tickers(requested: &[String], results: &[ResultRow]) -> ReconciliationResult {
    if requested.is_empty() {
        return ReconciliationResult::not_applicable();
    }

    let present: HashSet<String> = results
        .iter()
        .filter_map(|row| row.get(NAME_FIELD))
        .filter_map(|value| value.as_str())
        .map(str::to_uppercase)
        .collect();

    let mut valid_tickers = HashSet::new();
    let mut not_found = Vec::new();

    for ticker in requested {
        let upper = ticker.to_uppercase();
        if present.contains(&upper) {
            valid_tickers.insert(upper);
        } else {
            not_found.push(ticker.clone());
        }
    }

    ReconciliationResult {
        valid_tickers,
        not_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(names: &[&str]) -> Vec<ResultRow> {
        names
            .iter()
            .map(|name| {
                json!({ "name": name, "close": 10.0 })
                    .as_object()
                    .unwrap()
                    .clone()
            })
            .collect()
    }

    #[test]
    fn test_case_insensitive_match_preserves_requested_casing() {
        let requested = vec!["aapl".to_string(), "MSFT".to_string()];
        let result = reconcile_tickers(&requested, &rows(&["AAPL"]));

        assert_eq!(result.not_found, vec!["MSFT".to_string()]);
        assert!(result.valid_tickers.contains("AAPL"));
    }

    #[test]
    fn test_not_found_preserves_requested_order() {
        let requested = vec![
            "zzz".to_string(),
            "AAPL".to_string(),
            "Yyy".to_string(),
        ];
        let result = reconcile_tickers(&requested, &rows(&["aapl"]));
        assert_eq!(result.not_found, vec!["zzz".to_string(), "Yyy".to_string()]);
    }

    #[test]
    fn test_empty_request_list_is_not_applicable() {
        let result = reconcile_tickers(&[], &rows(&["AAPL", "MSFT"]));
        assert!(result.not_found.is_empty());
        assert!(result.valid_tickers.is_empty());
    }

    #[test]
    fn test_all_found() {
        let requested = vec!["AAPL".to_string(), "msft".to_string()];
        let result = reconcile_tickers(&requested, &rows(&["AAPL", "MSFT"]));
        assert!(result.not_found.is_empty());
        assert_eq!(result.valid_tickers.len(), 2);
    }

    #[test]
    fn test_rows_without_name_column_are_ignored() {
        let mut result_rows = rows(&["AAPL"]);
        result_rows.push(
            json!({ "close": 3.5 }).as_object().unwrap().clone(),
        );

        let requested = vec!["AAPL".to_string(), "MSFT".to_string()];
        let result = reconcile_tickers(&requested, &result_rows);
        assert_eq!(result.not_found, vec!["MSFT".to_string()]);
    }
}
