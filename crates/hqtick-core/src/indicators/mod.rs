//! Technical indicators over decoded bars and quotes.
//!
//! All functions are pure and allocate only their outputs. Missing input
//! yields `None` (or [`CrossSignal::None`]) rather than an error.

mod kdj;
mod macd;
mod moving_average;
mod order_book;

use serde::{Deserialize, Serialize};

pub use kdj::kdj_j;
pub use macd::{macd_cross, macd_histogram, CrossSignal};
pub use moving_average::{ema, sma};
pub use order_book::{book_pressure, pressure_from_totals, BookPressure};

use crate::{Bar, MarketFamily, Quote};

pub const DEFAULT_MA_PERIOD: usize = 20;
pub const DEFAULT_KDJ_PERIOD: usize = 9;

/// Window lengths used by [`IndicatorSet::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub ma_period: usize,
    pub kdj_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ma_period: DEFAULT_MA_PERIOD,
            kdj_period: DEFAULT_KDJ_PERIOD,
        }
    }
}

/// Latest indicator readings for one code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub ma_period: usize,
    /// Last simple moving average of closes.
    pub ma: Option<f64>,
    /// Reference price's deviation from `ma`, in percent.
    pub ma_deviation_pct: Option<f64>,
    pub kdj_j: Option<f64>,
    pub macd: CrossSignal,
    /// Turnover rate of the latest bar, in percent.
    pub turnover_pct: Option<f64>,
    /// A-share only; Hong Kong quotes carry no book.
    pub book: Option<BookPressure>,
}

impl IndicatorSet {
    /// Assemble the set from bars (oldest first) and an optional live quote.
    ///
    /// The reference price is the quote's current price when positive,
    /// otherwise the last close.
    pub fn compute(bars: &[Bar], quote: Option<&Quote>, params: &IndicatorParams) -> Self {
        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let ma = sma(&closes, params.ma_period).last().copied();

        let price = quote
            .map(|quote| quote.current)
            .filter(|current| *current > 0.0)
            .or_else(|| closes.last().copied());

        let ma_deviation_pct = match (price, ma) {
            (Some(price), Some(ma)) if ma != 0.0 => Some((price - ma) / ma * 100.0),
            _ => None,
        };

        let book = quote
            .filter(|quote| quote.family == MarketFamily::AShare)
            .map(|quote| book_pressure(&quote.book));

        Self {
            ma_period: params.ma_period,
            ma,
            ma_deviation_pct,
            kdj_j: kdj_j(bars, params.kdj_period),
            macd: macd_cross(&closes),
            turnover_pct: bars.last().map(|bar| bar.turnover_pct),
            book,
        }
    }
}
