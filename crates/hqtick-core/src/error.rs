use thiserror::Error;

use crate::fetcher::FetchError;
use crate::source::SourceError;

/// Validation and contract errors exposed by `hqtick-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("code cannot be empty")]
    EmptyCode,
    #[error("unknown market tag '{value}', expected one of sh, sz, bj, hk")]
    UnknownMarket { value: String },
    #[error("code '{value}' is not valid for market {market}")]
    InvalidCode { market: &'static str, value: String },

    #[error("invalid granularity '{value}', expected one of 1m, 5m, 15m, 30m, 60m, 1d, 1w, 1mo")]
    InvalidGranularity { value: String },
    #[error("invalid adjustment '{value}', expected one of none, forward, backward")]
    InvalidAdjustment { value: String },

    #[error("timestamp '{value}' is neither YYYY-MM-DD nor YYYY-MM-DD HH:MM")]
    InvalidTimestamp { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
