//! Quote line decoder.
//!
//! The provider answers with one JavaScript assignment per requested code:
//!
//! ```text
//! var hq_str_sh600000="浦发银行,10.85,10.85,10.93,...,2024-09-13,15:00:03,00";
//! ```
//!
//! Lines are matched against that exact grammar; anything else is skipped.

use tracing::debug;

use super::lenient::FieldReader;
use crate::{BookLevel, CanonicalCode, Market, MarketFamily, OrderBook, Quote, BOOK_DEPTH};

const LINE_MARKER: &str = "var hq_str_";

/// Minimum comma-separated field count of a Hong Kong quote payload.
pub const HK_MIN_FIELDS: usize = 19;
/// Minimum comma-separated field count of an A-share quote payload.
pub const A_SHARE_MIN_FIELDS: usize = 32;

const A_SHARE_BID_START: usize = 10;
const A_SHARE_ASK_START: usize = 20;

/// Decode every parseable line of a quote response, in line order.
pub fn parse_quote_response(text: &str) -> Vec<Quote> {
    text.lines()
        .filter_map(|line| {
            let quote = parse_quote_line(line);
            if quote.is_none() && !line.trim().is_empty() {
                debug!(line = %line.trim(), "skipping unparseable quote line");
            }
            quote
        })
        .collect()
}

/// Decode one `var hq_str_<code>="...";` line.
///
/// Returns `None` for lines that do not match the grammar, empty payloads and
/// payloads shorter than the family minimum.
pub fn parse_quote_line(line: &str) -> Option<Quote> {
    let (code, payload) = split_line(line)?;
    if payload.is_empty() {
        return None;
    }

    let fields: Vec<&str> = payload.split(',').collect();
    match code.family() {
        MarketFamily::HongKong => decode_hong_kong(code, &fields),
        MarketFamily::AShare => decode_a_share(code, &fields),
    }
}

fn split_line(line: &str) -> Option<(CanonicalCode, &str)> {
    let rest = line.trim().strip_prefix(LINE_MARKER)?;
    let (var_name, value) = rest.split_once('=')?;

    let tag = var_name.get(..2)?;
    let suffix = var_name.get(2..)?;
    if !tag.bytes().all(|b| b.is_ascii_lowercase())
        || suffix.is_empty()
        || !suffix.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return None;
    }

    let market: Market = tag.parse().ok()?;
    let code = CanonicalCode::new(market, suffix).ok()?;

    let value = value.trim();
    let value = value.strip_suffix(';').unwrap_or(value).trim_end();
    let payload = value.strip_prefix('"')?.strip_suffix('"')?;
    if payload.contains('"') {
        return None;
    }

    Some((code, payload))
}

fn decode_hong_kong(code: CanonicalCode, fields: &[&str]) -> Option<Quote> {
    if fields.len() < HK_MIN_FIELDS {
        return None;
    }

    let mut reader = FieldReader::new(fields);
    let current = reader.f64(2);
    let prev_close = reader.f64(3);
    let high = reader.f64(4);
    let low = reader.f64(5);
    let open = reader.f64(6);
    let bid = reader.f64(9);
    let ask = reader.f64(10);
    let amount = reader.f64(11);
    let volume = reader.u64(12);

    Some(Quote {
        family: MarketFamily::HongKong,
        currency: code.market().currency(),
        name: reader.text(1),
        current,
        prev_close,
        open,
        high,
        low,
        bid,
        ask,
        volume,
        amount,
        book: OrderBook::empty(),
        trade_date: reader.text(17),
        trade_time: reader.text(18),
        defaulted_fields: reader.defaulted(),
        code,
    })
}

fn decode_a_share(code: CanonicalCode, fields: &[&str]) -> Option<Quote> {
    if fields.len() < A_SHARE_MIN_FIELDS {
        return None;
    }

    let mut reader = FieldReader::new(fields);
    let open = reader.f64(1);
    let prev_close = reader.f64(2);
    let current = reader.f64(3);
    let high = reader.f64(4);
    let low = reader.f64(5);
    let bid = reader.f64(6);
    let ask = reader.f64(7);
    let volume = reader.u64(8);
    let amount = reader.f64(9);

    let bids = read_levels(&mut reader, A_SHARE_BID_START);
    let asks = read_levels(&mut reader, A_SHARE_ASK_START);

    Some(Quote {
        family: MarketFamily::AShare,
        currency: code.market().currency(),
        name: reader.text(0),
        current,
        prev_close,
        open,
        high,
        low,
        bid,
        ask,
        volume,
        amount,
        book: OrderBook::new(bids, asks),
        trade_date: reader.text(30),
        trade_time: reader.text(31),
        defaulted_fields: reader.defaulted(),
        code,
    })
}

/// Five (volume, price) pairs starting at `start`, best level first.
fn read_levels(reader: &mut FieldReader<'_>, start: usize) -> Vec<BookLevel> {
    (0..BOOK_DEPTH)
        .map(|level| {
            let volume = reader.u64(start + level * 2);
            let price = reader.f64(start + level * 2 + 1);
            BookLevel::new(volume, price)
        })
        .collect()
}
