//! # Domain Models
//!
//! Canonical domain types for hqtick market data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Market`] | Exchange tag (`sh`, `sz`, `bj`, `hk`) |
//! | [`CanonicalCode`] | Exchange-qualified security code |
//! | [`Quote`] | Real-time snapshot with optional five-level book |
//! | [`Bar`] | OHLCV observation with provider metrics |
//! | [`BarSeries`] | Bars for one code, oldest first |
//! | [`KlineGranularity`] | History bucket (1m .. 1mo) |
//! | [`PriceAdjustment`] | History price adjustment mode |
//!
//! All values are immutable once built and live for a single
//! resolve → fetch → decode → compute cycle.

mod code;
mod granularity;
mod market;
mod models;

pub(crate) use code::normalize_hk_code;
pub use code::CanonicalCode;
pub use granularity::{KlineGranularity, PriceAdjustment};
pub use market::{Currency, Market, MarketFamily};
pub use models::{Bar, BarSeries, BarTime, BookLevel, OrderBook, Quote, BOOK_DEPTH};
