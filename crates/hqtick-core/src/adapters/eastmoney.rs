use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::charset::Charset;
use crate::config::ProviderConfig;
use crate::decode::parse_kline_document;
use crate::fetcher::ResilientFetcher;
use crate::source::{Endpoint, HistoryRequest, HistorySource, SourceError};
use crate::BarSeries;

const KLINE_PATH: &str = "/api/qt/stock/kline/get";
const FIELDS1: &str = "f1,f2,f3,f4,f5,f6";
const FIELDS2: &str = "f51,f52,f53,f54,f55,f56,f57,f58,f59,f60,f61";
const OPEN_END: &str = "20500101";

/// Historical klines from the push2his endpoint.
#[derive(Clone)]
pub struct EastmoneyHistorySource {
    fetcher: ResilientFetcher,
    config: ProviderConfig,
}

impl EastmoneyHistorySource {
    pub fn new(fetcher: ResilientFetcher, config: ProviderConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn history_urls(&self, req: &HistoryRequest) -> Vec<String> {
        let query = format!(
            "secid={}&fields1={FIELDS1}&fields2={FIELDS2}&klt={}&fqt={}&end={OPEN_END}&lmt={}",
            req.secid(),
            req.granularity.klt(),
            req.adjustment.fqt(),
            req.limit,
        );
        self.config
            .kline_endpoints
            .iter()
            .map(|host| format!("{}{KLINE_PATH}?{query}", host.trim_end_matches('/')))
            .collect()
    }

    async fn fetch_history(&self, req: HistoryRequest) -> Result<BarSeries, SourceError> {
        let urls = self.history_urls(&req);
        let text = self
            .fetcher
            .fetch(&urls, &self.config.kline_headers, Charset::Utf8)
            .await
            .map_err(|error| SourceError::from_fetch(Endpoint::History, error))?;

        let bars = parse_kline_document(&text);
        debug!(code = %req.code, bars = bars.len(), "kline document decoded");
        Ok(BarSeries::new(req.code, bars))
    }
}

impl HistorySource for EastmoneyHistorySource {
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_history(req))
    }
}
