/// Simple moving average over a sliding `window`, one output per full window.
///
/// Empty when `window` is zero or longer than the input.
pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || window > values.len() {
        return Vec::new();
    }

    let width = window as f64;
    let mut sum: f64 = values[..window].iter().sum();
    let mut out = Vec::with_capacity(values.len() - window + 1);
    out.push(sum / width);

    for index in window..values.len() {
        sum += values[index] - values[index - window];
        out.push(sum / width);
    }
    out
}

/// Exponential moving average seeded with the first value, `k = 2 / (period + 1)`.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    if period == 0 {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = first;
    out.push(prev);
    for &value in &values[1..] {
        prev = value * k + prev * (1.0 - k);
        out.push(prev);
    }
    out
}
