use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Exchange a canonical code is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Sh,
    Sz,
    Bj,
    Hk,
}

/// Quote layout family; decides field offsets and whether an order book exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketFamily {
    AShare,
    HongKong,
}

/// Currency the quote turnover amount is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Cny,
    Hkd,
}

impl Market {
    pub const ALL: [Self; 4] = [Self::Sh, Self::Sz, Self::Bj, Self::Hk];

    /// Lower-case wire tag used by the quote and suggestion providers.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Sh => "sh",
            Self::Sz => "sz",
            Self::Bj => "bj",
            Self::Hk => "hk",
        }
    }

    pub const fn family(self) -> MarketFamily {
        match self {
            Self::Sh | Self::Sz | Self::Bj => MarketFamily::AShare,
            Self::Hk => MarketFamily::HongKong,
        }
    }

    pub const fn currency(self) -> Currency {
        match self.family() {
            MarketFamily::AShare => Currency::Cny,
            MarketFamily::HongKong => Currency::Hkd,
        }
    }

    /// Numeric market id the history provider expects in `secid`.
    pub const fn secid_prefix(self) -> u16 {
        match self {
            Self::Sh => 1,
            Self::Sz | Self::Bj => 0,
            Self::Hk => 116,
        }
    }

    /// Infer the A-share exchange of a bare 6-digit code from its leading digit.
    pub fn infer_from_digits(code: &str) -> Option<Self> {
        if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        match code.as_bytes()[0] {
            b'6' | b'9' | b'5' => Some(Self::Sh),
            b'0' | b'2' | b'3' => Some(Self::Sz),
            b'4' | b'8' => Some(Self::Bj),
            _ => None,
        }
    }
}

impl Display for Market {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Market {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sh" => Ok(Self::Sh),
            "sz" => Ok(Self::Sz),
            "bj" => Ok(Self::Bj),
            "hk" => Ok(Self::Hk),
            other => Err(ValidationError::UnknownMarket {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_exchange_from_leading_digit() {
        assert_eq!(Market::infer_from_digits("600519"), Some(Market::Sh));
        assert_eq!(Market::infer_from_digits("510300"), Some(Market::Sh));
        assert_eq!(Market::infer_from_digits("000001"), Some(Market::Sz));
        assert_eq!(Market::infer_from_digits("300750"), Some(Market::Sz));
        assert_eq!(Market::infer_from_digits("430047"), Some(Market::Bj));
        assert_eq!(Market::infer_from_digits("830799"), Some(Market::Bj));
        assert_eq!(Market::infer_from_digits("100000"), None);
        assert_eq!(Market::infer_from_digits("60051"), None);
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = Market::from_str("us").expect_err("must fail");
        assert!(matches!(err, ValidationError::UnknownMarket { .. }));
    }
}
