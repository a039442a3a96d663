use thiserror::Error;

/// Validation errors exposed by `tickerscope-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("company name cannot be empty")]
    EmptyCompanyName,

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("start date {start} must be before end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("refresh interval must be greater than zero")]
    ZeroInterval,
    #[error("rolling window must be greater than zero")]
    ZeroWindow,
}
