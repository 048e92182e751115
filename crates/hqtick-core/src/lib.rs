//! # hqtick Core
//!
//! Quote and kline acquisition for Shanghai, Shenzhen, Beijing and Hong Kong
//! listed securities, plus the indicators derived from them.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Markets, canonical codes, quotes and bars |
//! | [`resolver`] | Raw token → canonical code |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`retry`] | Backoff policy and injectable sleeper |
//! | [`charset`] | GBK / UTF-8 body decoding |
//! | [`fetcher`] | Multi-endpoint GET with retry |
//! | [`decode`] | Quote-line and kline-document decoders |
//! | [`adapters`] | Quote and history provider bindings |
//! | [`indicators`] | MA, EMA, KDJ, MACD cross, order-book pressure |
//! | [`service`] | Snapshot cycle and polling loop |
//! | [`config`] | Provider endpoints, headers and fetch policy |
//!
//! ## Architecture
//!
//! ```text
//! raw tokens ──▶ SymbolResolver ──▶ CanonicalCode
//!                                       │
//!            ┌──────────────────────────┴───────────────┐
//!            ▼                                          ▼
//!   SinaQuoteSource                          EastmoneyHistorySource
//!            │                                          │
//!            └──────────────▶ ResilientFetcher ◀────────┘
//!                                   │
//!                             HttpClient / Sleeper
//!            │                                          │
//!            ▼                                          ▼
//!   parse_quote_response                      parse_kline_document
//!            │                                          │
//!            └──────────────▶ IndicatorSet ◀────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hqtick_core::{MarketDataService, ProviderConfig, ReqwestHttpClient, ResilientFetcher};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ProviderConfig::default();
//!     let fetcher = ResilientFetcher::new(Arc::new(ReqwestHttpClient::new()), config.fetch.clone());
//!     let service = MarketDataService::new(fetcher, config);
//!
//!     let report = service.snapshot(&["600519", "腾讯控股"]).await;
//!     for entry in &report.entries {
//!         if let Some(quote) = &entry.quote {
//!             println!("{} {} {:.2}", entry.code, quote.name, quote.current);
//!         }
//!     }
//! }
//! ```

pub mod adapters;
pub mod charset;
pub mod config;
pub mod decode;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod indicators;
pub mod resolver;
pub mod retry;
pub mod service;
pub mod source;

pub use adapters::{EastmoneyHistorySource, SinaQuoteSource};
pub use charset::{decode_text, Charset};
pub use config::ProviderConfig;
pub use decode::{parse_kline_document, parse_quote_line, parse_quote_response};
pub use domain::*;
pub use error::{CoreError, ValidationError};
pub use fetcher::{FetchError, FetchPolicy, ResilientFetcher};
pub use http_client::{HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use indicators::{BookPressure, CrossSignal, IndicatorParams, IndicatorSet};
pub use resolver::{builtin_alias, normalize_code, parse_suggest_value, SuggestEntry, SymbolResolver};
pub use retry::{Backoff, RetryConfig, Sleeper, TokioSleeper};
pub use service::{CycleEntry, CycleReport, MarketDataService, Poller, SnapshotOptions};
pub use source::{
    Endpoint, HistoryRequest, HistorySource, QuoteBatch, QuoteRequest, QuoteSource, SourceError,
    SourceErrorKind,
};
