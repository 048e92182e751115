//! One resolve → fetch → decode → compute cycle, and the loop that repeats it.
//!
//! Every await is sequential: codes are resolved one at a time, quotes are
//! fetched as a single batch, and history (when enabled) is fetched per code
//! in resolution order. No state survives from one cycle to the next.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::adapters::{EastmoneyHistorySource, SinaQuoteSource};
use crate::config::ProviderConfig;
use crate::fetcher::ResilientFetcher;
use crate::indicators::{IndicatorParams, IndicatorSet};
use crate::resolver::SymbolResolver;
use crate::retry::{Sleeper, TokioSleeper};
use crate::source::{
    HistoryRequest, HistorySource, QuoteBatch, QuoteRequest, QuoteSource, SourceError,
    DEFAULT_HISTORY_LIMIT,
};
use crate::{CanonicalCode, KlineGranularity, PriceAdjustment, Quote};

/// Shortest accepted polling interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// What a cycle fetches beyond the quote batch.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOptions {
    /// Fetch history and compute an [`IndicatorSet`] per code.
    pub indicators: bool,
    pub granularity: KlineGranularity,
    pub adjustment: PriceAdjustment,
    pub limit: usize,
    pub params: IndicatorParams,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            indicators: false,
            granularity: KlineGranularity::Daily,
            adjustment: PriceAdjustment::default(),
            limit: DEFAULT_HISTORY_LIMIT,
            params: IndicatorParams::default(),
        }
    }
}

/// Result for one resolved code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleEntry {
    pub code: CanonicalCode,
    /// `None` when the provider returned nothing usable for this code.
    pub quote: Option<Quote>,
    pub indicators: Option<IndicatorSet>,
}

/// Outcome of one cycle, entries in resolution order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CycleReport {
    pub entries: Vec<CycleEntry>,
    /// Batch-level and per-code history failures.
    #[serde(serialize_with = "serialize_errors")]
    pub errors: Vec<SourceError>,
}

impl CycleReport {
    /// Nothing resolved, so nothing was fetched.
    pub fn is_unresolved(&self) -> bool {
        self.entries.is_empty()
    }
}

fn serialize_errors<S: serde::Serializer>(
    errors: &[SourceError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(errors.len()))?;
    for error in errors {
        seq.serialize_element(&error.to_string())?;
    }
    seq.end()
}

/// Runs snapshot cycles against a resolver and the two provider sources.
#[derive(Clone)]
pub struct MarketDataService {
    resolver: SymbolResolver,
    quotes: Arc<dyn QuoteSource>,
    history: Arc<dyn HistorySource>,
    options: SnapshotOptions,
}

impl MarketDataService {
    /// Wire the default providers around one shared fetcher.
    pub fn new(fetcher: ResilientFetcher, config: ProviderConfig) -> Self {
        let resolver = SymbolResolver::new(fetcher.clone(), config.clone());
        let quotes = Arc::new(SinaQuoteSource::new(fetcher.clone(), config.clone()));
        let history = Arc::new(EastmoneyHistorySource::new(fetcher, config));
        Self::from_parts(resolver, quotes, history)
    }

    pub fn from_parts(
        resolver: SymbolResolver,
        quotes: Arc<dyn QuoteSource>,
        history: Arc<dyn HistorySource>,
    ) -> Self {
        Self {
            resolver,
            quotes,
            history,
            options: SnapshotOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SnapshotOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve `tokens`, fetch one quote batch and, if enabled, history per code.
    ///
    /// A failed quote batch is recorded once in [`CycleReport::errors`]; every
    /// entry then carries `quote: None`.
    pub async fn snapshot<S: AsRef<str>>(&self, tokens: &[S]) -> CycleReport {
        let codes = self.resolver.resolve(tokens).await;
        let mut report = CycleReport::default();
        if codes.is_empty() {
            debug!("no tokens resolved; skipping fetch");
            return report;
        }

        let batch = match QuoteRequest::new(codes.clone()) {
            Ok(request) => match self.quotes.quotes(request).await {
                Ok(batch) => batch,
                Err(error) => {
                    warn!(error = %error, "quote batch failed");
                    report.errors.push(error);
                    QuoteBatch::default()
                }
            },
            Err(error) => {
                report.errors.push(error);
                QuoteBatch::default()
            }
        };

        for code in codes {
            let quote = batch.get(&code).cloned();
            let indicators = if self.options.indicators {
                self.indicators_for(&code, quote.as_ref(), &mut report.errors)
                    .await
            } else {
                None
            };
            report.entries.push(CycleEntry {
                code,
                quote,
                indicators,
            });
        }

        report
    }

    async fn indicators_for(
        &self,
        code: &CanonicalCode,
        quote: Option<&Quote>,
        errors: &mut Vec<SourceError>,
    ) -> Option<IndicatorSet> {
        let request = HistoryRequest::new(
            code.clone(),
            self.options.granularity,
            self.options.adjustment,
            self.options.limit,
        );

        let result = match request {
            Ok(request) => self.history.history(request).await,
            Err(error) => Err(error),
        };

        match result {
            Ok(series) => Some(IndicatorSet::compute(
                &series.bars,
                quote,
                &self.options.params,
            )),
            Err(error) => {
                warn!(code = %code, error = %error, "history fetch failed");
                errors.push(error);
                None
            }
        }
    }
}

/// Repeats [`MarketDataService::snapshot`] at a fixed interval.
///
/// The stop flag is checked only between cycles; a cycle in flight, including
/// its retry sleeps, always runs to completion.
#[derive(Clone)]
pub struct Poller {
    service: MarketDataService,
    interval: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl Poller {
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(service: MarketDataService, interval: Duration) -> Self {
        Self {
            service,
            interval: interval.max(MIN_POLL_INTERVAL),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run cycles until `stop` is set, handing each report to `on_report`.
    ///
    /// Returns the number of completed cycles.
    pub async fn run<S, F>(&self, tokens: &[S], stop: &AtomicBool, mut on_report: F) -> u64
    where
        S: AsRef<str>,
        F: FnMut(&CycleReport),
    {
        let mut cycles = 0_u64;
        while !stop.load(Ordering::SeqCst) {
            let report = self.service.snapshot(tokens).await;
            on_report(&report);
            cycles += 1;

            if stop.load(Ordering::SeqCst) {
                break;
            }
            self.sleeper.sleep(self.interval).await;
        }
        debug!(cycles, "poller stopped");
        cycles
    }
}
