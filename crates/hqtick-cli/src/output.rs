//! Console rendering of cycle reports.
//!
//! Table lines follow the familiar quote-terminal layout:
//!
//! ```text
//! sh600519 贵州茅台 | 现价 1510.50 | 涨跌 12.50 0.83% | 成交量 23456手 成交额 35.41亿 | 委比 62.16% 买卖比 4.29 | 2024-09-13 15:00:03
//! ```

use std::io::Write;

use hqtick_core::indicators::book_pressure;
use hqtick_core::{
    CoreError, CrossSignal, CycleReport, Endpoint, IndicatorSet, MarketFamily, Quote,
};

use crate::cli::OutputFormat;
use crate::error::CliError;

pub const UNRESOLVED_HINT: &str =
    "未识别到有效标的。可输入代码或名称，如 600519、浦发银行、上证指数、科创50";
const HK_BOOK_NOTICE: &str = "  当前接口不提供港股五档盘口。";
const SHARES_PER_LOT: u64 = 100;
const HUNDRED_MILLION: f64 = 1e8;

/// Writes each report in the selected format.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub format: OutputFormat,
    pub detail: bool,
}

impl Renderer {
    pub fn emit(&self, report: &CycleReport, out: &mut impl Write) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Json => writeln!(out, "{}", render_json(report)?)?,
            OutputFormat::Table => {
                for line in render_table(report, self.detail) {
                    writeln!(out, "{line}")?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }

    pub fn emit_stdout(&self, report: &CycleReport) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.emit(report, &mut out)
    }
}

pub fn render_json(report: &CycleReport) -> Result<String, CoreError> {
    Ok(serde_json::to_string(report)?)
}

pub fn render_table(report: &CycleReport, detail: bool) -> Vec<String> {
    let mut lines = Vec::new();

    for error in &report.errors {
        let label = match error.endpoint() {
            Endpoint::Quote => "请求行情失败",
            Endpoint::History => "请求历史行情失败",
        };
        lines.push(format!("{label}：{error}"));
    }

    if report.is_unresolved() {
        lines.push(String::from(UNRESOLVED_HINT));
        return lines;
    }

    for entry in &report.entries {
        match &entry.quote {
            Some(quote) => {
                lines.push(quote_line(quote));
                if detail {
                    lines.extend(order_book_lines(quote));
                }
            }
            None => lines.push(format!("{}: 无数据", entry.code)),
        }
        if let Some(indicators) = &entry.indicators {
            lines.push(indicator_line(indicators));
        }
    }

    lines
}

pub fn quote_line(quote: &Quote) -> String {
    let name = if quote.name.is_empty() {
        "-"
    } else {
        quote.name.as_str()
    };
    let amount = quote.amount / HUNDRED_MILLION;

    let volume_part = match quote.family {
        MarketFamily::HongKong => format!("成交量 {}股 成交额 {amount:.2}亿", quote.volume),
        MarketFamily::AShare => format!(
            "成交量 {}手 成交额 {amount:.2}亿",
            quote.volume / SHARES_PER_LOT
        ),
    };

    let ratio_part = match quote.family {
        MarketFamily::HongKong => String::new(),
        MarketFamily::AShare => {
            let pressure = book_pressure(&quote.book);
            format!(
                "| 委比 {:.2}% 买卖比 {} ",
                pressure.skew_pct,
                format_ratio(pressure.ratio)
            )
        }
    };

    format!(
        "{} {name} | 现价 {:.2} | 涨跌 {:.2} {:.2}% | {volume_part} {ratio_part}| {} {}",
        quote.code,
        quote.current,
        quote.change(),
        quote.change_pct(),
        quote.trade_date,
        quote.trade_time,
    )
}

/// Asks from level 5 down to 1, then bids from 1 to 5.
pub fn order_book_lines(quote: &Quote) -> Vec<String> {
    if quote.family == MarketFamily::HongKong {
        return vec![String::from(HK_BOOK_NOTICE)];
    }

    let mut lines = vec![String::from("  卖盘(五档):")];
    for (index, level) in quote.book.asks.iter().enumerate().rev() {
        lines.push(format!(
            "    卖{}: 价 {:.2} 量 {}股",
            index + 1,
            level.price,
            level.volume
        ));
    }
    lines.push(String::from("  买盘(五档):"));
    for (index, level) in quote.book.bids.iter().enumerate() {
        lines.push(format!(
            "    买{}: 价 {:.2} 量 {}股",
            index + 1,
            level.price,
            level.volume
        ));
    }
    lines
}

pub fn indicator_line(set: &IndicatorSet) -> String {
    let ma = set
        .ma
        .map_or_else(|| String::from("-"), |value| format!("{value:.2}"));
    let deviation = set
        .ma_deviation_pct
        .map_or_else(|| String::from("-"), |value| format!("{value:+.2}%"));
    let kdj = set
        .kdj_j
        .map_or_else(|| String::from("-"), |value| format!("{value:.2}"));
    let turnover = set
        .turnover_pct
        .map_or_else(|| String::from("-"), |value| format!("{value:.2}%"));
    let macd = match set.macd {
        CrossSignal::Bullish => "金叉",
        CrossSignal::Bearish => "死叉",
        CrossSignal::None => "无",
    };

    format!(
        "  MA{} {ma} 偏离 {deviation} | KDJ-J {kdj} | MACD {macd} | 换手 {turnover}",
        set.ma_period
    )
}

fn format_ratio(ratio: f64) -> String {
    if ratio.is_infinite() {
        String::from("∞")
    } else {
        format!("{ratio:.2}")
    }
}
