use hqtick_core::MarketDataService;

use super::Outcome;
use crate::error::CliError;
use crate::output::Renderer;

/// Run one cycle and print it.
pub async fn run(
    service: &MarketDataService,
    renderer: Renderer,
    tokens: &[String],
) -> Result<Outcome, CliError> {
    let report = service.snapshot(tokens).await;
    renderer.emit_stdout(&report)?;

    Ok(Outcome {
        had_errors: !report.errors.is_empty(),
    })
}
