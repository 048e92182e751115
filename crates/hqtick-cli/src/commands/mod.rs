mod prompt;
mod snapshot;
mod watch;

use std::sync::Arc;

use hqtick_core::{
    MarketDataService, ProviderConfig, ReqwestHttpClient, ResilientFetcher, RetryConfig,
    SnapshotOptions,
};

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::Renderer;

/// How a run ended, for the exit code.
#[derive(Debug, Clone, Copy, Default)]
pub struct Outcome {
    pub had_errors: bool,
}

pub async fn run(cli: &Cli) -> Result<Outcome, CliError> {
    if cli.indicators && cli.limit == 0 {
        return Err(CliError::Argument(String::from(
            "--limit must be greater than zero",
        )));
    }

    let service = build_service(cli);
    let renderer = Renderer {
        format: cli.format,
        detail: cli.detail,
    };

    if cli.codes.is_empty() {
        return prompt::run(&service, renderer).await;
    }
    if cli.looping {
        return watch::run(service, renderer, &cli.codes, cli.interval).await;
    }
    snapshot::run(&service, renderer, &cli.codes).await
}

fn build_service(cli: &Cli) -> MarketDataService {
    let config = ProviderConfig::default()
        .with_timeout_ms(cli.timeout_ms)
        .with_retry(RetryConfig::exponential(cli.retries));
    let fetcher = ResilientFetcher::new(Arc::new(ReqwestHttpClient::new()), config.fetch.clone());

    MarketDataService::new(fetcher, config).with_options(SnapshotOptions {
        indicators: cli.indicators,
        granularity: cli.granularity,
        adjustment: cli.adjust,
        limit: cli.limit,
        ..SnapshotOptions::default()
    })
}
