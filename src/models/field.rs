use crate::models::FilterOp;
use serde::{Deserialize, Serialize};

/// Type of a screenable field, as served by the field metadata service.
/// The UI uses this to pick a sensible default operator for a new filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    Text,
    Percent,
}

impl FieldType {
    /// Default operator for a freshly added filter on a field of this type.
    pub fn default_op(&self) -> FilterOp {
        match self {
            FieldType::Number | FieldType::Percent => FilterOp::Gte,
            FieldType::Text => FilterOp::Eq,
        }
    }
}

/// One entry of the field metadata catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ops() {
        assert_eq!(FieldType::Number.default_op(), FilterOp::Gte);
        assert_eq!(FieldType::Percent.default_op(), FilterOp::Gte);
        assert_eq!(FieldType::Text.default_op(), FilterOp::Eq);
    }

    #[test]
    fn test_metadata_wire_shape() {
        let meta: FieldMetadata =
            serde_json::from_str(r#"{"name":"change_percent","type":"percent"}"#).unwrap();
        assert_eq!(meta.field_type, FieldType::Percent);
    }
}
