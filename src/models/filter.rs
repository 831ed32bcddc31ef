use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Comparison operators the downstream scan service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Neq,
    Between,
    NotBetween,
    In,
    NotIn,
}

impl FilterOp {
    /// Operators that take a list value instead of a single scalar.
    pub fn takes_list(&self) -> bool {
        matches!(
            self,
            FilterOp::Between | FilterOp::NotBetween | FilterOp::In | FilterOp::NotIn
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::Between => "between",
            FilterOp::NotBetween => "not_between",
            FilterOp::In => "in",
            FilterOp::NotIn => "not_in",
        }
    }
}

/// A single filter operand (number or string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn is_number(&self) -> bool {
        matches!(self, Scalar::Number(_))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

/// Filter value: a single scalar for comparison operators, a list for
/// `between`/`not_between`/`in`/`not_in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(Scalar),
    Many(Vec<Scalar>),
}

impl FilterValue {
    pub fn number(value: f64) -> Self {
        FilterValue::One(Scalar::Number(value))
    }

    pub fn text(value: &str) -> Self {
        FilterValue::One(Scalar::Text(value.to_string()))
    }

    pub fn numbers(values: &[f64]) -> Self {
        FilterValue::Many(values.iter().map(|v| Scalar::Number(*v)).collect())
    }

    pub fn texts<S: AsRef<str>>(values: &[S]) -> Self {
        FilterValue::Many(
            values
                .iter()
                .map(|v| Scalar::Text(v.as_ref().to_string()))
                .collect(),
        )
    }
}

/// Single field condition applied by a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl Filter {
    pub fn new(field: &str, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.to_string(),
            op,
            value,
        }
    }

    /// Validate the operator/value shape before the filter is allowed
    /// into a request. The downstream service also checks this, but the
    /// boundary where user input becomes a `Filter` must fail first.
    pub fn validate(&self) -> Result<()> {
        match (self.op, &self.value) {
            (FilterOp::Between | FilterOp::NotBetween, FilterValue::Many(values)) => {
                if values.len() != 2 {
                    return Err(Error::Validation(format!(
                        "Operator '{}' on '{}' requires exactly 2 values, got {}",
                        self.op.as_str(),
                        self.field,
                        values.len()
                    )));
                }
                if !values.iter().all(Scalar::is_number) {
                    return Err(Error::Validation(format!(
                        "Operator '{}' on '{}' requires numeric bounds",
                        self.op.as_str(),
                        self.field
                    )));
                }
                Ok(())
            }
            (FilterOp::In | FilterOp::NotIn, FilterValue::Many(values)) => {
                if values.is_empty() {
                    return Err(Error::Validation(format!(
                        "Operator '{}' on '{}' requires a non-empty list",
                        self.op.as_str(),
                        self.field
                    )));
                }
                Ok(())
            }
            (op, FilterValue::Many(_)) => Err(Error::Validation(format!(
                "Operator '{}' on '{}' requires a single value, got a list",
                op.as_str(),
                self.field
            ))),
            (op, FilterValue::One(_)) if op.takes_list() => Err(Error::Validation(format!(
                "Operator '{}' on '{}' requires a list of values",
                op.as_str(),
                self.field
            ))),
            _ => Ok(()),
        }
    }
}
