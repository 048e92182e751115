use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::charset::Charset;
use crate::config::ProviderConfig;
use crate::decode::parse_quote_response;
use crate::fetcher::ResilientFetcher;
use crate::source::{Endpoint, QuoteBatch, QuoteRequest, QuoteSource, SourceError};

/// Real-time quotes from the `list=` endpoint.
#[derive(Clone)]
pub struct SinaQuoteSource {
    fetcher: ResilientFetcher,
    config: ProviderConfig,
}

impl SinaQuoteSource {
    pub fn new(fetcher: ResilientFetcher, config: ProviderConfig) -> Self {
        Self { fetcher, config }
    }

    /// One URL per configured host, primary first.
    pub fn quote_urls(&self, req: &QuoteRequest) -> Vec<String> {
        let codes = req.joined();
        self.config
            .quote_endpoints
            .iter()
            .map(|host| format!("{}/list={codes}", host.trim_end_matches('/')))
            .collect()
    }

    async fn fetch_quotes(&self, req: QuoteRequest) -> Result<QuoteBatch, SourceError> {
        let urls = self.quote_urls(&req);
        let text = self
            .fetcher
            .fetch(&urls, &self.config.quote_headers, Charset::Gbk)
            .await
            .map_err(|error| SourceError::from_fetch(Endpoint::Quote, error))?;

        let quotes = parse_quote_response(&text);
        debug!(requested = req.codes.len(), decoded = quotes.len(), "quote batch decoded");
        Ok(QuoteBatch { quotes })
    }
}

impl QuoteSource for SinaQuoteSource {
    fn quotes<'a>(
        &'a self,
        req: QuoteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteBatch, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_quotes(req))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::http_client::ReqwestHttpClient;
    use crate::CanonicalCode;

    #[test]
    fn builds_one_list_url_per_host() {
        let config = ProviderConfig::default()
            .with_quote_endpoints(["https://a.test/", "http://b.test"]);
        let fetcher = ResilientFetcher::new(Arc::new(ReqwestHttpClient::new()), config.fetch.clone());
        let source = SinaQuoteSource::new(fetcher, config);
        let req = QuoteRequest::new(vec![
            CanonicalCode::parse("sh600519").expect("code"),
            CanonicalCode::parse("hk700").expect("code"),
        ])
        .expect("request");

        assert_eq!(
            source.quote_urls(&req),
            vec![
                "https://a.test/list=sh600519,hk00700",
                "http://b.test/list=sh600519,hk00700",
            ]
        );
    }
}
