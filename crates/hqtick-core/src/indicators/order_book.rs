use serde::{Deserialize, Serialize};

use crate::OrderBook;

/// Bid/ask volume imbalance of a five-level book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookPressure {
    pub bid_total: u64,
    pub ask_total: u64,
    /// `(bid - ask) / (bid + ask) * 100`, 0 for an empty book.
    pub skew_pct: f64,
    /// `bid / ask`; infinite when only bids rest, 1 for an empty book.
    pub ratio: f64,
}

pub fn book_pressure(book: &OrderBook) -> BookPressure {
    pressure_from_totals(book.bid_volume(), book.ask_volume())
}

pub fn pressure_from_totals(bid_total: u64, ask_total: u64) -> BookPressure {
    let bids = bid_total as f64;
    let asks = ask_total as f64;

    let skew_pct = if bid_total == 0 && ask_total == 0 {
        0.0
    } else {
        (bids - asks) / (bids + asks) * 100.0
    };

    let ratio = match (bid_total, ask_total) {
        (0, 0) => 1.0,
        (_, 0) => f64::INFINITY,
        _ => bids / asks,
    };

    BookPressure {
        bid_total,
        ask_total,
        skew_pct,
        ratio,
    }
}
