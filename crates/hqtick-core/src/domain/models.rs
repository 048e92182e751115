use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

use crate::{CanonicalCode, Currency, MarketFamily, ValidationError};

/// Number of price levels published per side by the quote provider.
pub const BOOK_DEPTH: usize = 5;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const MINUTE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const SECOND_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// One resting order level: volume in shares at a price.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BookLevel {
    pub volume: u64,
    pub price: f64,
}

impl BookLevel {
    pub const fn new(volume: u64, price: f64) -> Self {
        Self { volume, price }
    }
}

/// Five-level order book. Index 0 on each side is the best level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    pub fn new(bids: Vec<BookLevel>, asks: Vec<BookLevel>) -> Self {
        Self { bids, asks }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Total resting bid volume, saturating at `u64::MAX`.
    pub fn bid_volume(&self) -> u64 {
        total_volume(&self.bids)
    }

    /// Total resting ask volume, saturating at `u64::MAX`.
    pub fn ask_volume(&self) -> u64 {
        total_volume(&self.asks)
    }
}

fn total_volume(levels: &[BookLevel]) -> u64 {
    levels
        .iter()
        .fold(0_u64, |total, level| total.saturating_add(level.volume))
}

/// Real-time snapshot for one canonical code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub code: CanonicalCode,
    pub family: MarketFamily,
    pub name: String,
    pub current: f64,
    pub prev_close: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub bid: f64,
    pub ask: f64,
    /// Cumulative traded volume in shares.
    pub volume: u64,
    /// Cumulative turnover, denominated in `currency`.
    pub amount: f64,
    pub currency: Currency,
    /// Empty for Hong Kong quotes; the provider does not publish depth there.
    pub book: OrderBook,
    pub trade_date: String,
    pub trade_time: String,
    /// Numeric fields that failed to parse and were substituted with zero.
    pub defaulted_fields: u32,
}

impl Quote {
    /// Absolute change versus previous close, 0 without a usable previous close.
    pub fn change(&self) -> f64 {
        if self.prev_close > 0.0 {
            self.current - self.prev_close
        } else {
            0.0
        }
    }

    /// Percentage change versus previous close.
    pub fn change_pct(&self) -> f64 {
        if self.prev_close > 0.0 {
            self.change() / self.prev_close * 100.0
        } else {
            0.0
        }
    }
}

/// Bar timestamp: a trading date for daily-or-coarser bars, date and time otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BarTime {
    Date(Date),
    DateTime(PrimitiveDateTime),
}

impl BarTime {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if let Ok(date_time) = PrimitiveDateTime::parse(trimmed, MINUTE_FORMAT) {
            return Ok(Self::DateTime(date_time));
        }
        if let Ok(date_time) = PrimitiveDateTime::parse(trimmed, SECOND_FORMAT) {
            return Ok(Self::DateTime(date_time));
        }
        Date::parse(trimmed, DATE_FORMAT)
            .map(Self::Date)
            .map_err(|_| ValidationError::InvalidTimestamp {
                value: trimmed.to_owned(),
            })
    }

    pub fn date(self) -> Date {
        match self {
            Self::Date(date) => date,
            Self::DateTime(date_time) => date_time.date(),
        }
    }
}

impl Display for BarTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let formatted = match self {
            Self::Date(date) => date.format(DATE_FORMAT),
            Self::DateTime(date_time) => date_time.format(MINUTE_FORMAT),
        }
        .map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl TryFrom<String> for BarTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BarTime> for String {
    fn from(value: BarTime) -> Self {
        value.to_string()
    }
}

/// One OHLCV observation plus the provider's derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: BarTime,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub amount: f64,
    pub amplitude_pct: f64,
    pub change_pct: f64,
    pub change: f64,
    pub turnover_pct: f64,
}

/// Bars for one code, oldest first, in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub code: CanonicalCode,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(code: CanonicalCode, bars: Vec<Bar>) -> Self {
        Self { code, bars }
    }
}
