use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hqtick_core::{MarketDataService, Poller};
use tracing::debug;

use super::Outcome;
use crate::error::CliError;
use crate::output::Renderer;

/// Refresh until Ctrl-C. The interrupt is honoured once the current cycle finishes.
pub async fn run(
    service: MarketDataService,
    renderer: Renderer,
    tokens: &[String],
    interval_secs: f64,
) -> Result<Outcome, CliError> {
    let interval = Duration::try_from_secs_f64(interval_secs).map_err(|_| {
        CliError::Argument(format!(
            "--interval must be a non-negative number of seconds, got {interval_secs}"
        ))
    })?;

    let stop = Arc::new(AtomicBool::new(false));
    let signal_stop = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received; stopping after the current cycle");
            signal_stop.store(true, Ordering::SeqCst);
        }
    });

    let poller = Poller::new(service, interval);
    let mut failure: Option<CliError> = None;
    poller
        .run(tokens, &stop, |report| {
            if let Err(error) = renderer.emit_stdout(report) {
                if failure.is_none() {
                    failure = Some(error);
                }
                stop.store(true, Ordering::SeqCst);
            }
        })
        .await;

    match failure {
        Some(error) => Err(error),
        None => Ok(Outcome::default()),
    }
}
