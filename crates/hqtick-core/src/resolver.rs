//! Raw user token → canonical code.
//!
//! Resolution stops at the first step that succeeds:
//!
//! 1. direct normalisation of code-shaped input ([`normalize_code`]),
//! 2. the builtin index alias table ([`builtin_alias`]),
//! 3. the remote suggestion endpoint, one URL variant at a time.
//!
//! Tokens that fail every step are dropped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::charset::Charset;
use crate::config::ProviderConfig;
use crate::domain::normalize_hk_code;
use crate::fetcher::ResilientFetcher;
use crate::{CanonicalCode, Market};

/// Suggestion type prefix of Hong Kong instruments.
const HK_SUGGEST_TYPE_PREFIX: char = '3';

const ALIASES: &[(&str, &str)] = &[
    ("上证", "sh000001"),
    ("上证指数", "sh000001"),
    ("上证综指", "sh000001"),
    ("SSE", "sh000001"),
    ("深证成指", "sz399001"),
    ("深成指", "sz399001"),
    ("SZSE", "sz399001"),
    ("创业板", "sz399006"),
    ("创业板指", "sz399006"),
    ("创业板指数", "sz399006"),
    ("CHINEXT", "sz399006"),
    ("科创50", "sh000688"),
    ("科创板50", "sh000688"),
    ("科创50指数", "sh000688"),
    ("STAR50", "sh000688"),
    ("沪深300", "sh000300"),
    ("沪深三百", "sh000300"),
    ("HS300", "sh000300"),
    ("CSI300", "sh000300"),
    ("上证50", "sh000016"),
    ("上证五十", "sh000016"),
    ("SSE50", "sh000016"),
    ("中证500", "sh000905"),
    ("CSI500", "sh000905"),
    ("中证1000", "sh000852"),
    ("CSI1000", "sh000852"),
    ("恒生指数", "hkHSI"),
    ("恒指", "hkHSI"),
    ("HSI", "hkHSI"),
    ("恒生科技指数", "hkHSTECH"),
    ("恒生科技", "hkHSTECH"),
    ("HSTECH", "hkHSTECH"),
    ("恒生中国企业指数", "hkHSCEI"),
    ("国企指数", "hkHSCEI"),
    ("HSCEI", "hkHSCEI"),
    ("恒生香港中资企业指数", "hkHSCCI"),
    ("HSCCI", "hkHSCCI"),
];

/// Normalise code-shaped input; `None` when the token needs a lookup.
pub fn normalize_code(raw: &str) -> Option<CanonicalCode> {
    CanonicalCode::normalize(raw)
}

/// Builtin alias lookup. Latin aliases match case-insensitively.
pub fn builtin_alias(token: &str) -> Option<CanonicalCode> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    ALIASES
        .iter()
        .find(|(alias, _)| {
            if alias.is_ascii() {
                alias.eq_ignore_ascii_case(token)
            } else {
                *alias == token
            }
        })
        .and_then(|(_, code)| CanonicalCode::parse(code).ok())
}

/// One record of a suggestion response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestEntry {
    pub name: String,
    /// Provider instrument type, e.g. `11` for A-share equities, `31` for HK.
    pub kind: String,
    pub code: String,
    pub full: String,
}

impl SuggestEntry {
    /// Canonical code this entry points at, if the quote endpoint can serve it.
    pub fn candidate(&self) -> Option<CanonicalCode> {
        let full = self.full.to_ascii_lowercase();
        let prefixed = Market::ALL.iter().any(|market| full.starts_with(market.tag()));
        if prefixed {
            if let Ok(code) = CanonicalCode::parse(&full) {
                return Some(code);
            }
        }

        if !self.kind.starts_with(HK_SUGGEST_TYPE_PREFIX) {
            return None;
        }

        let raw = if self.full.is_empty() {
            self.code.as_str()
        } else {
            self.full.as_str()
        };
        let code = normalize_hk_code(raw)?;
        CanonicalCode::new(Market::Hk, &code).ok()
    }
}

/// Parse `var suggestvalue="name,type,code,full,...;...";`.
pub fn parse_suggest_value(text: &str) -> Vec<SuggestEntry> {
    let (Some(start), Some(end)) = (text.find('"'), text.rfind('"')) else {
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }

    text[start + 1..end]
        .split(';')
        .filter(|record| !record.is_empty())
        .filter_map(|record| {
            let fields: Vec<&str> = record.split(',').collect();
            if fields.len() < 4 {
                return None;
            }
            Some(SuggestEntry {
                name: fields[0].trim().to_owned(),
                kind: fields[1].trim().to_owned(),
                code: fields[2].trim().to_owned(),
                full: fields[3].trim().to_owned(),
            })
        })
        .collect()
}

/// Resolves batches of raw tokens, consulting the suggestion endpoint last.
#[derive(Clone)]
pub struct SymbolResolver {
    fetcher: ResilientFetcher,
    config: ProviderConfig,
}

impl SymbolResolver {
    pub fn new(fetcher: ResilientFetcher, config: ProviderConfig) -> Self {
        Self { fetcher, config }
    }

    /// Resolve tokens in order, dropping unresolved and duplicate results.
    pub async fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<CanonicalCode> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for token in tokens {
            let token = token.as_ref().trim();
            if token.is_empty() {
                continue;
            }

            match self.resolve_one(token).await {
                Some(code) => {
                    if seen.insert(code.clone()) {
                        resolved.push(code);
                    }
                }
                None => debug!(token, "token did not resolve"),
            }
        }

        resolved
    }

    /// Resolve a single non-empty token.
    pub async fn resolve_one(&self, token: &str) -> Option<CanonicalCode> {
        if let Some(code) = normalize_code(token) {
            return Some(code);
        }
        if let Some(code) = builtin_alias(token) {
            return Some(code);
        }
        self.suggest(token).await
    }

    /// First usable suggestion, trying each URL variant in order.
    pub async fn suggest(&self, keyword: &str) -> Option<CanonicalCode> {
        for url in self.suggest_urls(keyword) {
            let endpoints = [url];
            let text = match self
                .fetcher
                .fetch(&endpoints, &self.config.quote_headers, Charset::Gbk)
                .await
            {
                Ok(text) => text,
                Err(error) => {
                    warn!(url = %endpoints[0], error = %error, "suggestion lookup failed");
                    continue;
                }
            };

            let candidate = parse_suggest_value(&text)
                .iter()
                .find_map(SuggestEntry::candidate);
            if candidate.is_some() {
                return candidate;
            }
        }
        None
    }

    fn suggest_urls(&self, keyword: &str) -> [String; 3] {
        let host = self.config.suggest_endpoint.trim_end_matches('/');
        let key = urlencoding::encode(keyword.trim());
        [
            format!("{host}/suggest/type=11&key={key}"),
            format!("{host}/suggest/type=31&key={key}"),
            format!("{host}/suggest/key={key}"),
        ]
    }
}
