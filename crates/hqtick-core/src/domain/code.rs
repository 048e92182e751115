use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Market, MarketFamily, ValidationError};

const HK_NUMERIC_WIDTH: usize = 5;

/// Exchange-qualified security code, e.g. `sh600519`, `hk00700`, `hkHSI`.
///
/// The only form the fetcher and decoders accept. Construction normalises the
/// code part, so parsing the `Display` output yields an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalCode {
    market: Market,
    code: String,
}

impl CanonicalCode {
    /// Build a code for `market`, normalising the code part per market rules.
    pub fn new(market: Market, code: &str) -> Result<Self, ValidationError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyCode);
        }

        let code = match market.family() {
            MarketFamily::AShare => {
                if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ValidationError::InvalidCode {
                        market: market.tag(),
                        value: trimmed.to_owned(),
                    });
                }
                trimmed.to_owned()
            }
            MarketFamily::HongKong => normalize_hk_code(trimmed).ok_or_else(|| {
                ValidationError::InvalidCode {
                    market: market.tag(),
                    value: trimmed.to_owned(),
                }
            })?,
        };

        Ok(Self { market, code })
    }

    /// Parse a prefixed code such as `SH600519` or `hk700`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyCode);
        }

        let (tag, rest) = match (trimmed.get(..2), trimmed.get(2..)) {
            (Some(tag), Some(rest)) => (tag, rest),
            _ => {
                return Err(ValidationError::UnknownMarket {
                    value: trimmed.to_owned(),
                })
            }
        };

        let market: Market = tag.parse()?;
        Self::new(market, rest)
    }

    /// Direct normalisation of a raw user token.
    ///
    /// Accepts prefixed codes, bare 6-digit A-share codes (exchange inferred
    /// from the leading digit) and bare 1-5 digit Hong Kong codes. Returns
    /// `None` for anything that needs alias or remote lookup.
    pub fn normalize(raw: &str) -> Option<Self> {
        let token = raw.trim().to_ascii_lowercase();
        if token.is_empty() {
            return None;
        }

        let prefixed = Market::ALL
            .iter()
            .any(|market| token.starts_with(market.tag()));
        if prefixed {
            return Self::parse(&token).ok();
        }

        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        match token.len() {
            6 => Market::infer_from_digits(&token).and_then(|market| Self::new(market, &token).ok()),
            1..=5 => Self::new(Market::Hk, &token).ok(),
            _ => None,
        }
    }

    pub const fn market(&self) -> Market {
        self.market
    }

    pub const fn family(&self) -> MarketFamily {
        self.market.family()
    }

    /// Code part without the market tag.
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Zero-pad numeric Hong Kong codes to five digits, upper-case alphabetic ones.
pub(crate) fn normalize_hk_code(raw: &str) -> Option<String> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    if raw.bytes().all(|b| b.is_ascii_digit()) {
        Some(format!("{raw:0>width$}", width = HK_NUMERIC_WIDTH))
    } else {
        Some(raw.to_ascii_uppercase())
    }
}

impl Display for CanonicalCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.market.tag(), self.code)
    }
}

impl TryFrom<String> for CanonicalCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for CanonicalCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CanonicalCode> for String {
    fn from(value: CanonicalCode) -> Self {
        value.to_string()
    }
}
