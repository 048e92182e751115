//! Behaviour of the indicator engine.

mod support;

use hqtick_core::indicators::{
    book_pressure, ema, kdj_j, macd_cross, macd_histogram, pressure_from_totals, sma,
};
use hqtick_core::{
    parse_quote_line, Bar, BarTime, CrossSignal, IndicatorParams, IndicatorSet, OrderBook,
};
use support::{MAOTAI_LINE, TENCENT_LINE};

fn flat_bars(count: usize, close: f64) -> Vec<Bar> {
    (0..count)
        .map(|_| Bar {
            time: BarTime::parse("2024-09-13").expect("date"),
            open: close,
            close,
            high: close + 1.0,
            low: close - 1.0,
            volume: 1_000.0,
            amount: 1_000.0 * close,
            amplitude_pct: 0.0,
            change_pct: 0.0,
            change: 0.0,
            turnover_pct: 0.42,
        })
        .collect()
}

#[test]
fn sma_of_one_to_five_over_three() {
    assert_eq!(sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3), vec![2.0, 3.0, 4.0]);
}

#[test]
fn ema_of_a_constant_stays_constant() {
    let out = ema(&[7.5; 30], 12);
    assert_eq!(out.len(), 30);
    assert!(out.iter().all(|value| (value - 7.5).abs() < 1e-12));
}

#[test]
fn macd_cross_tracks_the_histogram_sign_change() {
    // Given: a long decline followed by a sharp rally
    let mut closes: Vec<f64> = (0..40).map(|i| 100.0 - i as f64).collect();
    closes.extend((1..=15).map(|i| 61.0 + 4.0 * i as f64));

    // When: the histogram is scanned bar by bar
    let mut saw_bullish = false;
    for end in 2..=closes.len() {
        let histogram = macd_histogram(&closes[..end]);
        let (prev, last) = (histogram[end - 2], histogram[end - 1]);
        let signal = macd_cross(&closes[..end]);

        // Then: the cross state always agrees with the last two values
        let expected = if prev < 0.0 && last >= 0.0 {
            CrossSignal::Bullish
        } else if prev > 0.0 && last <= 0.0 {
            CrossSignal::Bearish
        } else {
            CrossSignal::None
        };
        assert_eq!(signal, expected, "at bar {end}");
        saw_bullish |= signal == CrossSignal::Bullish;
    }

    // And: the rally produced a bullish cross somewhere
    assert!(saw_bullish);
}

#[test]
fn macd_needs_two_points() {
    assert_eq!(macd_cross(&[]), CrossSignal::None);
    assert_eq!(macd_cross(&[1.0]), CrossSignal::None);
}

#[test]
fn book_pressure_edge_cases() {
    let empty = book_pressure(&OrderBook::empty());
    assert_eq!(empty.skew_pct, 0.0);
    assert_eq!(empty.ratio, 1.0);

    let bids_only = pressure_from_totals(100, 0);
    assert_eq!(bids_only.ratio, f64::INFINITY);
    assert_eq!(bids_only.skew_pct, 100.0);
}

#[test]
fn indicator_set_uses_live_price_against_the_moving_average() {
    // Given: twenty flat bars at 10 and an A-share quote
    let bars = flat_bars(20, 10.0);
    let mut quote = parse_quote_line(MAOTAI_LINE).expect("quote");
    quote.current = 11.0;

    // When: the set is computed with default params
    let set = IndicatorSet::compute(&bars, Some(&quote), &IndicatorParams::default());

    // Then: deviation is measured from the live price
    assert_eq!(set.ma_period, 20);
    assert_eq!(set.ma, Some(10.0));
    assert!((set.ma_deviation_pct.expect("deviation") - 10.0).abs() < 1e-9);
    assert_eq!(set.turnover_pct, Some(0.42));
    assert_eq!(set.macd, CrossSignal::None);
    assert!(set.kdj_j.is_some());

    // And: the A-share book is summarised
    let book = set.book.expect("A-share has a book");
    assert_eq!(book.bid_total, 1_500);
    assert_eq!(book.ask_total, 350);
}

#[test]
fn indicator_set_falls_back_to_last_close_and_skips_hk_book() {
    // Given: an HK quote without a usable price
    let bars = flat_bars(20, 10.0);
    let mut quote = parse_quote_line(TENCENT_LINE).expect("quote");
    quote.current = 0.0;

    // When: the set is computed
    let set = IndicatorSet::compute(&bars, Some(&quote), &IndicatorParams::default());

    // Then: the last close is the reference and there is no book pressure
    assert_eq!(set.ma_deviation_pct, Some(0.0));
    assert!(set.book.is_none());
}

#[test]
fn short_history_leaves_gaps_instead_of_failing() {
    let set = IndicatorSet::compute(&flat_bars(5, 10.0), None, &IndicatorParams::default());

    assert_eq!(set.ma, None);
    assert_eq!(set.ma_deviation_pct, None);
    assert!(set.kdj_j.is_some());
    assert!(set.book.is_none());

    let empty = IndicatorSet::compute(&[], None, &IndicatorParams::default());
    assert_eq!(empty.kdj_j, None);
    assert_eq!(empty.turnover_pct, None);
}

#[test]
fn kdj_window_rolls_forward_and_carries_k_and_d() {
    // Given: three bars with a two-bar window, so the first low drops out
    let bar = |high: f64, low: f64, close: f64| Bar {
        high,
        low,
        close,
        open: close,
        ..flat_bars(1, close).remove(0)
    };
    let bars = [bar(10.0, 8.0, 9.0), bar(12.0, 9.0, 11.0), bar(11.0, 10.0, 10.5)];

    // When: J is computed over period 2
    let j = kdj_j(&bars, 2).expect("value");

    // Then: RSV runs 50, 75, 50 against windows [8,10], [8,12], [9,12]
    // K = 50, 58.33, 55.56 and D = 50, 52.78, 53.70, so J = 1600/27
    assert!((j - 1600.0 / 27.0).abs() < 1e-9, "got {j}");
}

#[test]
fn oversized_book_volumes_saturate_instead_of_overflowing() {
    // Given: a decodable quote whose two best bids carry u64::MAX shares
    let line = MAOTAI_LINE.replacen(
        "100,1510.40,200,1510.30",
        "18446744073709551615,1510.40,18446744073709551615,1510.30",
        1,
    );
    let quote = parse_quote_line(&line).expect("quote");

    // When: the book pressure and the full indicator set are computed
    let pressure = book_pressure(&quote.book);
    let bars = flat_bars(20, 10.0);
    let set = IndicatorSet::compute(&bars, Some(&quote), &IndicatorParams::default());

    // Then: the bid side saturates and the ratios stay finite
    assert_eq!(pressure.bid_total, u64::MAX);
    assert_eq!(pressure.ask_total, 350);
    assert!(pressure.ratio.is_finite() && pressure.ratio > 1.0);
    assert!(pressure.skew_pct > 99.0 && pressure.skew_pct <= 100.0);
    assert_eq!(set.book, Some(pressure));
}
