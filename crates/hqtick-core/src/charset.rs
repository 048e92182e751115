//! Response body decoding.

use encoding_rs::{Encoding, GBK};

/// Preferred encoding of a provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// Legacy mainland encoding used by the quote and suggestion providers.
    #[default]
    Gbk,
    Utf8,
}

/// Decode `bytes` with the preferred charset.
///
/// A byte-order mark wins over the preference. GBK is decoded strictly; a
/// malformed sequence makes the whole body fall back to lossy UTF-8.
pub fn decode_text(bytes: &[u8], charset: Charset) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    match charset {
        Charset::Gbk => match GBK.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => text.into_owned(),
            None => {
                tracing::debug!("GBK decode failed, falling back to UTF-8");
                String::from_utf8_lossy(bytes).into_owned()
            }
        },
        Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
    }
}
