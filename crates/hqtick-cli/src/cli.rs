//! CLI argument definitions for hqtick.
//!
//! # Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `CODES...` | prompt | Codes or names; without any, read them from stdin |
//! | `-d, --detail` | `false` | Print the five-level order book |
//! | `--indicators` | `false` | Fetch history and print indicators |
//! | `--granularity` | `1d` | History bar size |
//! | `--adjust` | `forward` | History price adjustment |
//! | `--limit` | `120` | History bars requested |
//! | `-l, --loop` | `false` | Refresh until Ctrl-C |
//! | `-i, --interval` | `2.0` | Seconds between refreshes, at least 0.5 |
//! | `--format` | `table` | `table` or `json` |
//! | `--timeout-ms` | `5000` | Per-request timeout |
//! | `--retries` | `2` | Retries per endpoint |
//! | `-v, --verbose` | `false` | Debug logging on stderr |
//!
//! # Examples
//!
//! ```bash
//! hqtick 600519 腾讯控股 上证指数
//! hqtick sh600000 -d --loop -i 1
//! hqtick 000001 --indicators --granularity 1w --format json
//! ```

use clap::{Parser, ValueEnum};
use hqtick_core::source::DEFAULT_HISTORY_LIMIT;
use hqtick_core::{KlineGranularity, PriceAdjustment};

/// A-share and Hong Kong real-time quotes.
#[derive(Debug, Parser)]
#[command(
    name = "hqtick",
    author,
    version,
    about = "A-share / Hong Kong real-time quotes and indicators",
    long_about = "Look up real-time quotes for Shanghai, Shenzhen, Beijing and Hong Kong \
listed securities by code or by name.\n\
\n\
Codes may be given bare (600519, 700), prefixed (sh600519, hk00700), as an \
index name (上证指数, 恒生指数, HSI) or as a security name (浦发银行)."
)]
pub struct Cli {
    /// Codes or names. Without any, an interactive prompt reads them from stdin.
    pub codes: Vec<String>,

    /// Print the five-level order book under each quote.
    #[arg(short = 'd', long, default_value_t = false)]
    pub detail: bool,

    /// Fetch history and print MA deviation, KDJ J, MACD cross and turnover.
    #[arg(long, default_value_t = false)]
    pub indicators: bool,

    /// History bar size (1m, 5m, 15m, 30m, 60m, 1d, 1w, 1mo).
    #[arg(long, default_value_t = KlineGranularity::Daily)]
    pub granularity: KlineGranularity,

    /// History price adjustment (none, forward/qfq, backward/hfq).
    #[arg(long, default_value_t = PriceAdjustment::Forward)]
    pub adjust: PriceAdjustment,

    /// Number of history bars to request.
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub limit: usize,

    /// Keep refreshing until interrupted.
    #[arg(short = 'l', long = "loop", default_value_t = false)]
    pub looping: bool,

    /// Seconds between refreshes with --loop; values below 0.5 are raised to 0.5.
    #[arg(short = 'i', long, default_value_t = 2.0)]
    pub interval: f64,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Retries per endpoint before falling back to the next one.
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    /// Log every fetch attempt and skipped record to stderr.
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_codes() {
        let cli = Cli::try_parse_from([
            "hqtick", "600519", "腾讯控股", "-d", "-l", "-i", "0.8", "--granularity", "1w",
            "--adjust", "hfq", "--format", "json",
        ])
        .expect("valid args");

        assert_eq!(cli.codes, vec!["600519", "腾讯控股"]);
        assert!(cli.detail);
        assert!(cli.looping);
        assert_eq!(cli.interval, 0.8);
        assert_eq!(cli.granularity, KlineGranularity::Weekly);
        assert_eq!(cli.adjust, PriceAdjustment::Backward);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn defaults_match_a_single_table_cycle() {
        let cli = Cli::try_parse_from(["hqtick"]).expect("valid args");

        assert!(cli.codes.is_empty());
        assert!(!cli.looping);
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(cli.retries, 2);
    }

    #[test]
    fn rejects_unknown_granularity() {
        assert!(Cli::try_parse_from(["hqtick", "--granularity", "2d"]).is_err());
    }
}
