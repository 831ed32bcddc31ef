mod field;
mod filter;
mod pagination;
mod scan;

pub use field::{FieldMetadata, FieldType};
pub use filter::{Filter, FilterOp, FilterValue, Scalar};
pub use pagination::PaginationState;
pub use scan::{
    OrderBy, ResultRow, SavedScreenerConfig, ScanOptions, ScanRequest, ScanResponse,
    ServiceErrorBody, SortDirection,
};
