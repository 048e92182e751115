use serde::{Deserialize, Serialize};

use super::moving_average::ema;

const FAST: usize = 12;
const SLOW: usize = 26;
const SIGNAL: usize = 9;

/// MACD crossover state on the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossSignal {
    /// Histogram went from negative to non-negative.
    Bullish,
    /// Histogram went from positive to non-positive.
    Bearish,
    #[default]
    None,
}

impl CrossSignal {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::None => "none",
        }
    }
}

/// MACD histogram (`EMA12 - EMA26` minus its EMA9), one value per close.
pub fn macd_histogram(closes: &[f64]) -> Vec<f64> {
    let fast = ema(closes, FAST);
    let slow = ema(closes, SLOW);
    let dif: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let dea = ema(&dif, SIGNAL);
    dif.iter().zip(&dea).map(|(d, e)| d - e).collect()
}

/// Crossover state from the last two histogram values.
pub fn macd_cross(closes: &[f64]) -> CrossSignal {
    let histogram = macd_histogram(closes);
    cross_from_histogram(&histogram)
}

fn cross_from_histogram(histogram: &[f64]) -> CrossSignal {
    let [.., prev, last] = histogram else {
        return CrossSignal::None;
    };

    if *prev < 0.0 && *last >= 0.0 {
        CrossSignal::Bullish
    } else if *prev > 0.0 && *last <= 0.0 {
        CrossSignal::Bearish
    } else {
        CrossSignal::None
    }
}
