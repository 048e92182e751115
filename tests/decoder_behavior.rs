//! Behaviour of the quote-line and kline-document decoders.

mod support;

use hqtick_core::decode::{lenient_u64, A_SHARE_MIN_FIELDS, HK_MIN_FIELDS};
use hqtick_core::{
    decode_text, parse_kline_document, parse_quote_line, parse_quote_response, BarTime, Charset,
    MarketFamily,
};
use support::{gbk, MAOTAI_LINE, TENCENT_LINE};

#[test]
fn gbk_response_decodes_into_both_quote_shapes() {
    // Given: a GBK response carrying an A-share and an HK line
    let body = gbk(&format!("{MAOTAI_LINE}\n{TENCENT_LINE}\n"));

    // When: it is decoded and parsed
    let quotes = parse_quote_response(&decode_text(&body, Charset::Gbk));

    // Then: both quotes come back, in line order, with their own shapes
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].name, "贵州茅台");
    assert_eq!(quotes[0].family, MarketFamily::AShare);
    assert_eq!(quotes[0].book.bids.len(), 5);
    assert_eq!(quotes[1].name, "腾讯控股");
    assert_eq!(quotes[1].family, MarketFamily::HongKong);
    assert!(quotes[1].book.is_empty());
}

#[test]
fn records_below_the_field_minimum_yield_no_quote() {
    // Given: an HK payload with 18 fields and an A-share payload with 31
    let hk = format!("var hq_str_hk00700=\"{}\";", vec!["1"; HK_MIN_FIELDS - 1].join(","));
    let a_share = format!(
        "var hq_str_sh600519=\"{}\";",
        vec!["1"; A_SHARE_MIN_FIELDS - 1].join(",")
    );

    // Then: neither decodes
    assert!(parse_quote_line(&hk).is_none());
    assert!(parse_quote_line(&a_share).is_none());

    // And: one more field is enough
    let hk = format!("var hq_str_hk00700=\"{}\";", vec!["1"; HK_MIN_FIELDS].join(","));
    assert!(parse_quote_line(&hk).is_some());
}

#[test]
fn suspended_code_with_empty_payload_is_skipped() {
    let text = format!("var hq_str_sz000001=\"\";\n{MAOTAI_LINE}");

    let quotes = parse_quote_response(&text);

    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].code.to_string(), "sh600519");
}

#[test]
fn volume_accepts_float_text() {
    let line = MAOTAI_LINE.replace(",2345600,", ",2345600.0,");

    let quote = parse_quote_line(&line).expect("still parses");

    assert_eq!(quote.volume, 2_345_600);
    assert_eq!(quote.defaulted_fields, 0);
    assert_eq!(lenient_u64("1200.0").value, 1200);
}

#[test]
fn kline_document_keeps_good_records_and_drops_malformed_ones() {
    // Given: one record that is too short and one good record
    let text = r#"{"rc":0,"data":{"code":"600519","klines":[
        "2024-09-12,1500.00,1498.00",
        "2024-09-13,1498.00,1510.50,1515.00,1495.00,34567,5212345678.00,1.34,0.83,12.50,0.28"
    ]}}"#;

    // When: it is decoded
    let bars = parse_kline_document(text);

    // Then: exactly the good bar remains
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].time, BarTime::parse("2024-09-13").expect("date"));
    assert_eq!(bars[0].close, 1510.5);
    assert_eq!(bars[0].change, 12.5);
}

#[test]
fn kline_document_without_data_is_empty() {
    assert!(parse_kline_document(r#"{"rc":102,"data":null}"#).is_empty());
    assert!(parse_kline_document("").is_empty());
}
