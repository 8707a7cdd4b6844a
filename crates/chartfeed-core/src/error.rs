use thiserror::Error;

/// Validation and contract errors exposed by `chartfeed-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("timestamp must be RFC3339, YYYY-MM-DD, or a unix epoch: '{value}'")]
    InvalidTimestamp { value: String },
    #[error("epoch value {value} is out of the representable range")]
    EpochOutOfRange { value: i64 },

    #[error("invalid range '{value}', expected one of 24H, 1W, 1M, 3M, YTD, ALL")]
    InvalidRange { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
