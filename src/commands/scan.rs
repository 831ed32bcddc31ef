use crate::config::Settings;
use crate::error::{Error, Result};
use crate::models::{Filter, FilterOp, FilterValue, PaginationState, Scalar, ScanOptions};
use crate::services::{ScanClient, ScanController};
use tracing::warn;

pub async fn run(
    markets: Vec<String>,
    columns: &str,
    filter_specs: &[String],
    tickers: Option<&str>,
    page: usize,
    page_size: usize,
) -> Result<()> {
    let filters = filter_specs
        .iter()
        .map(|spec| parse_filter(spec))
        .collect::<Result<Vec<_>>>()?;

    let options = ScanOptions {
        markets,
        filters,
        tickers: split_list(tickers.unwrap_or("")),
        columns: split_list(columns),
        order_by: None,
        limit: None,
        offset: None,
    };

    let settings = Settings::from_env()?;
    let client = ScanClient::new(&settings.scan_url)?;
    let mut pagination = PaginationState::with_page(page, page_size);

    let outcome = ScanController::new(&client)
        .run(&options, &mut pagination)
        .await?;

    println!(
        "{} of {} rows (page {}, {} ms)",
        outcome.response.results.len(),
        outcome.response.total_count,
        pagination.current_page,
        outcome.response.duration_ms
    );

    for row in &outcome.response.results {
        let line = serde_json::to_string(row)
            .map_err(|e| Error::Parse(format!("Failed to render row: {}", e)))?;
        println!("{}", line);
    }

    if !outcome.reconciliation.not_found.is_empty() {
        warn!(tickers = ?outcome.reconciliation.not_found, "Requested tickers not found");
        println!("Not found: {}", outcome.reconciliation.not_found.join(", "));
    }

    Ok(())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a `field:op:value` filter spec. List operators take
/// comma-separated values; operands that parse as numbers are numbers,
/// everything else is text.
fn parse_filter(spec: &str) -> Result<Filter> {
    let mut parts = spec.splitn(3, ':');
    let (field, op, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(field), Some(op), Some(value)) if !field.is_empty() && !value.is_empty() => {
            (field, op, value)
        }
        _ => {
            return Err(Error::Validation(format!(
                "Invalid filter '{}', expected field:op:value",
                spec
            )))
        }
    };

    let op = parse_op(op)?;

    let value = if op.takes_list() {
        FilterValue::Many(split_list(value).into_iter().map(parse_scalar).collect())
    } else {
        FilterValue::One(parse_scalar(value.trim().to_string()))
    };

    let filter = Filter::new(field, op, value);
    filter.validate()?;
    Ok(filter)
}

fn parse_op(raw: &str) -> Result<FilterOp> {
    let op = match raw {
        "gt" => FilterOp::Gt,
        "gte" => FilterOp::Gte,
        "lt" => FilterOp::Lt,
        "lte" => FilterOp::Lte,
        "eq" => FilterOp::Eq,
        "neq" => FilterOp::Neq,
        "between" => FilterOp::Between,
        "not_between" => FilterOp::NotBetween,
        "in" => FilterOp::In,
        "not_in" => FilterOp::NotIn,
        other => {
            return Err(Error::Validation(format!(
                "Unknown filter operator: {}",
                other
            )))
        }
    };
    Ok(op)
}

fn parse_scalar(raw: String) -> Scalar {
    match raw.parse::<f64>() {
        Ok(number) => Scalar::Number(number),
        Err(_) => Scalar::Text(raw),
    }
}
