//! Provider payload decoders.
//!
//! Decoders are pure: text in, records out. Anything that does not match the
//! expected shape is skipped, never surfaced as an error.

mod kline;
mod lenient;
mod quote;

pub use kline::{parse_kline_document, parse_kline_record, KLINE_MIN_FIELDS};
pub use lenient::{lenient_f64, lenient_u64, Lenient};
pub use quote::{parse_quote_line, parse_quote_response, A_SHARE_MIN_FIELDS, HK_MIN_FIELDS};
