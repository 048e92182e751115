use crate::Bar;

const SEED: f64 = 50.0;

/// Last J value of the KDJ stochastic oscillator.
///
/// K and D start at 50. Each bar's RSV uses the trailing `period`-bar
/// high/low window, shorter at the start of the series; a flat window gives
/// an RSV of 0. `None` for no bars or a zero period.
pub fn kdj_j(bars: &[Bar], period: usize) -> Option<f64> {
    if bars.is_empty() || period == 0 {
        return None;
    }

    let mut k = SEED;
    let mut d = SEED;
    for (index, bar) in bars.iter().enumerate() {
        let start = (index + 1).saturating_sub(period);
        let window = &bars[start..=index];
        let high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

        let rsv = if high > low {
            (bar.close - low) / (high - low) * 100.0
        } else {
            0.0
        };

        k = 2.0 / 3.0 * k + rsv / 3.0;
        d = 2.0 / 3.0 * d + k / 3.0;
    }

    Some(3.0 * k - 2.0 * d)
}
