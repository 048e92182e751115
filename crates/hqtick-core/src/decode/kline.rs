//! Kline JSON document decoder.
//!
//! The history provider wraps bars in `{"rc":0,"data":{"code":..,"klines":[..]}}`
//! where each kline is a comma-joined string in `fields2` order
//! (f51..f61).

use serde::Deserialize;
use tracing::debug;

use super::lenient::FieldReader;
use crate::{Bar, BarTime};

/// Minimum field count of one kline record.
pub const KLINE_MIN_FIELDS: usize = 11;

#[derive(Debug, Deserialize)]
struct KlineEnvelope {
    #[serde(default)]
    data: Option<KlineData>,
}

#[derive(Debug, Deserialize)]
struct KlineData {
    #[serde(default)]
    klines: Option<Vec<String>>,
}

/// Decode a kline document into bars, oldest first.
///
/// Malformed JSON and documents without `data.klines` yield an empty vector.
pub fn parse_kline_document(text: &str) -> Vec<Bar> {
    let envelope: KlineEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(error) => {
            debug!(error = %error, "kline document is not valid JSON");
            return Vec::new();
        }
    };

    let Some(klines) = envelope.data.and_then(|data| data.klines) else {
        debug!("kline document has no data");
        return Vec::new();
    };

    klines
        .iter()
        .filter_map(|record| {
            let bar = parse_kline_record(record);
            if bar.is_none() {
                debug!(record = %record, "skipping malformed kline record");
            }
            bar
        })
        .collect()
}

/// Decode one `date,open,close,high,low,volume,amount,amp,chg%,chg,turnover` record.
pub fn parse_kline_record(record: &str) -> Option<Bar> {
    let fields: Vec<&str> = record.split(',').collect();
    if fields.len() < KLINE_MIN_FIELDS {
        return None;
    }

    let time = BarTime::parse(fields[0]).ok()?;
    let mut reader = FieldReader::new(&fields);

    Some(Bar {
        time,
        open: reader.f64(1),
        close: reader.f64(2),
        high: reader.f64(3),
        low: reader.f64(4),
        volume: reader.f64(5),
        amount: reader.f64(6),
        amplitude_pct: reader.f64(7),
        change_pct: reader.f64(8),
        change: reader.f64(9),
        turnover_pct: reader.f64(10),
    })
}
