//! Provider adapters binding the resilient fetcher to concrete endpoints.
//!
//! | Adapter | Trait | Charset |
//! |---------|-------|---------|
//! | [`SinaQuoteSource`] | [`QuoteSource`](crate::source::QuoteSource) | GBK |
//! | [`EastmoneyHistorySource`] | [`HistorySource`](crate::source::HistorySource) | UTF-8 |

mod eastmoney;
mod sina;

pub use eastmoney::EastmoneyHistorySource;
pub use sina::SinaQuoteSource;
