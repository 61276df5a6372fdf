use thiserror::Error;

/// Validation errors raised while constructing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be ISO YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("timestamp {value} is outside the representable date range")]
    TimestampOutOfRange { value: i64 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,
}

/// Failures surfaced by a history provider. No retry or recovery is
/// attempted; each variant propagates to the caller as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    /// Error reported by the provider itself inside an otherwise valid
    /// response body (unknown ticker, bad range, and so on).
    #[error("upstream error {code}: {description}")]
    Upstream { code: String, description: String },

    #[error("malformed upstream payload: {0}")]
    Decode(String),
}

/// Top-level error for the history service.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
