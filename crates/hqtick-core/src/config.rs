//! Provider endpoints, headers and fetch policy.
//!
//! Everything the adapters and the resolver need from the outside world is
//! carried by [`ProviderConfig`]; tests swap in fake hosts through the
//! `with_*` builders.

use std::collections::BTreeMap;

use crate::fetcher::FetchPolicy;
use crate::retry::RetryConfig;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const SINA_QUOTE_ENDPOINTS: [&str; 2] = ["https://hq.sinajs.cn", "http://hq.sinajs.cn"];
pub const SINA_SUGGEST_ENDPOINT: &str = "https://suggest3.sinajs.cn";
pub const EASTMONEY_KLINE_ENDPOINTS: [&str; 2] = [
    "https://push2his.eastmoney.com",
    "https://63.push2his.eastmoney.com",
];

/// Endpoints, headers and fetch policy for every provider the core talks to.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Quote hosts, primary first. Requests go to `<host>/list=<codes>`.
    pub quote_endpoints: Vec<String>,
    /// Suggestion host. Requests go to `<host>/suggest/...`.
    pub suggest_endpoint: String,
    /// Kline hosts, primary first.
    pub kline_endpoints: Vec<String>,
    pub quote_headers: BTreeMap<String, String>,
    pub kline_headers: BTreeMap<String, String>,
    pub fetch: FetchPolicy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            quote_endpoints: SINA_QUOTE_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            suggest_endpoint: SINA_SUGGEST_ENDPOINT.to_owned(),
            kline_endpoints: EASTMONEY_KLINE_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            quote_headers: sina_headers(),
            kline_headers: eastmoney_headers(),
            fetch: FetchPolicy::default(),
        }
    }
}

impl ProviderConfig {
    pub fn with_quote_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quote_endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_suggest_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.suggest_endpoint = endpoint.into();
        self
    }

    pub fn with_kline_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kline_endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.fetch.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.fetch.retry = retry;
        self
    }
}

/// Headers the quote and suggestion hosts require: referer, browser UA and a GBK charset hint.
pub fn sina_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(
        String::from("referer"),
        String::from("https://finance.sina.com.cn/"),
    );
    headers.insert(String::from("user-agent"), String::from(BROWSER_USER_AGENT));
    headers.insert(
        String::from("accept-charset"),
        String::from("GBK,utf-8;q=0.7,*;q=0.3"),
    );
    headers
}

pub fn eastmoney_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(
        String::from("referer"),
        String::from("https://quote.eastmoney.com/"),
    );
    headers.insert(String::from("user-agent"), String::from(BROWSER_USER_AGENT));
    headers.insert(String::from("accept"), String::from("application/json"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sina_headers_have_required_fields() {
        let headers = sina_headers();
        assert!(headers.contains_key("referer"));
        assert!(headers.contains_key("user-agent"));
        assert!(headers["accept-charset"].starts_with("GBK"));
    }

    #[test]
    fn builders_override_defaults() {
        let config = ProviderConfig::default()
            .with_quote_endpoints(["http://a.test", "http://b.test"])
            .with_timeout_ms(250)
            .with_retry(RetryConfig::no_retry());

        assert_eq!(config.quote_endpoints, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.fetch.timeout_ms, 250);
        assert_eq!(config.fetch.retry.max_retries, 0);
        assert_eq!(config.kline_endpoints.len(), 2);
    }
}
