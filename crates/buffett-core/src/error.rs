use thiserror::Error;

use crate::domain::SeriesField;

/// Validation and contract errors exposed by `buffett-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or digit: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
    #[error("exchange suffix '{value}' must be ASCII letters only")]
    InvalidExchangeSuffix { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("request_id must contain at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match 'v<major>.<minor>.<patch>': '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("window '{name}' must be greater than zero")]
    EmptyWindow { name: &'static str },
    #[error("{field} has {actual} values, expected {expected}")]
    WindowMismatch {
        field: SeriesField,
        expected: usize,
        actual: usize,
    },
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("book value per share must be nonzero; price-to-book is undefined")]
    ZeroBookValue,
}
