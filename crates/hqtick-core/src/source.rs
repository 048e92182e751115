//! Adapter-level request/response types and errors.
//!
//! | Endpoint | Request | Response |
//! |----------|---------|----------|
//! | Quote | [`QuoteRequest`] | [`QuoteBatch`] |
//! | History | [`HistoryRequest`] | [`BarSeries`] |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::fetcher::FetchError;
use crate::{BarSeries, CanonicalCode, KlineGranularity, PriceAdjustment, Quote};

/// Default number of bars requested from the history provider.
pub const DEFAULT_HISTORY_LIMIT: usize = 120;

/// Provider endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Quote,
    History,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::History => "history",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    InvalidRequest,
}

/// Structured source error surfaced once per batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    endpoint: Endpoint,
    message: String,
}

impl SourceError {
    pub fn unavailable(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            endpoint,
            message: message.into(),
        }
    }

    pub fn invalid_request(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            endpoint,
            message: message.into(),
        }
    }

    pub fn from_fetch(endpoint: Endpoint, error: FetchError) -> Self {
        Self::unavailable(endpoint, format!("{endpoint} fetch failed: {error}"))
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for the quote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub codes: Vec<CanonicalCode>,
}

impl QuoteRequest {
    pub fn new(codes: Vec<CanonicalCode>) -> Result<Self, SourceError> {
        if codes.is_empty() {
            return Err(SourceError::invalid_request(
                Endpoint::Quote,
                "quote request must include at least one code",
            ));
        }
        Ok(Self { codes })
    }

    /// Comma-joined code list as the provider expects it in `list=`.
    pub fn joined(&self) -> String {
        self.codes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Request payload for the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub code: CanonicalCode,
    pub granularity: KlineGranularity,
    pub adjustment: PriceAdjustment,
    pub limit: usize,
}

impl HistoryRequest {
    pub fn new(
        code: CanonicalCode,
        granularity: KlineGranularity,
        adjustment: PriceAdjustment,
        limit: usize,
    ) -> Result<Self, SourceError> {
        if limit == 0 {
            return Err(SourceError::invalid_request(
                Endpoint::History,
                "history request limit must be greater than zero",
            ));
        }
        Ok(Self {
            code,
            granularity,
            adjustment,
            limit,
        })
    }

    pub fn daily(code: CanonicalCode) -> Self {
        Self {
            code,
            granularity: KlineGranularity::Daily,
            adjustment: PriceAdjustment::default(),
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Provider security id, `<market-id>.<code>`.
    pub fn secid(&self) -> String {
        format!("{}.{}", self.code.market().secid_prefix(), self.code.code())
    }
}

/// Decoded quotes, in response line order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteBatch {
    pub quotes: Vec<Quote>,
}

impl QuoteBatch {
    pub fn get(&self, code: &CanonicalCode) -> Option<&Quote> {
        self.quotes.iter().find(|quote| &quote.code == code)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Real-time quote provider.
pub trait QuoteSource: Send + Sync {
    /// Fetches and decodes quotes for every requested code in one batch.
    ///
    /// Codes the provider has no data for are simply absent from the batch.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] once for the whole batch when every endpoint failed.
    fn quotes<'a>(
        &'a self,
        req: QuoteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteBatch, SourceError>> + Send + 'a>>;
}

/// Historical kline provider.
pub trait HistorySource: Send + Sync {
    /// Fetches and decodes bars for one code, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when every endpoint failed. An unparseable
    /// document is an empty series, not an error.
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>>;
}
