use std::io::Write;

use hqtick_core::MarketDataService;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::Outcome;
use crate::error::CliError;
use crate::output::Renderer;

const PROMPT: &str =
    "请输入代码/名称(如 600519、浦发银行、00700、恒生指数；多只用空格分隔，输入 q 退出): ";

/// Read whitespace-separated tokens from stdin until `q` or EOF.
pub async fn run(service: &MarketDataService, renderer: Renderer) -> Result<Outcome, CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(Outcome::default());
        };

        let input = line.trim();
        if input.eq_ignore_ascii_case("q") {
            return Ok(Outcome::default());
        }
        if input.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = input.split_whitespace().collect();
        let report = service.snapshot(&tokens).await;
        renderer.emit_stdout(&report)?;
    }
}
