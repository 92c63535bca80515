//! Recursive smoothing primitives shared by the indicators.
//!
//! Every function takes the previous state as an `Option` and returns the next
//! value. `None` only exists before the first sample; afterwards the state is
//! always defined.

/// Floor used for denominators that may collapse to zero.
pub const EPSILON: f64 = 1e-10;

/// Exponential moving average step with `k = 2 / (length + 1)`.
///
/// Written as `prev + k * (value - prev)`, which is algebraically
/// `value * k + prev * (1 - k)` but stays exact when `value == prev`.
pub fn ema(prev: Option<f64>, value: f64, length: usize) -> f64 {
    match prev {
        None => value,
        Some(prev) => {
            let k = 2.0 / (length as f64 + 1.0);
            prev + k * (value - prev)
        }
    }
}

/// Wilder-style running mean seeded with the first sample.
pub fn rma_warm(prev: Option<f64>, value: f64, length: usize) -> f64 {
    match prev {
        None => value,
        Some(prev) => prev + (value - prev) / length as f64,
    }
}

/// True range of a bar given the previous close, if any.
pub fn true_range(high: f64, low: f64, prev_close: Option<f64>) -> f64 {
    let range = high - low;
    match prev_close {
        None => range,
        Some(prev) => range.max((high - prev).abs()).max((low - prev).abs()),
    }
}

/// Wilder ATR step; the first true range seeds the average.
pub fn atr_wilder(prev: Option<f64>, tr: f64, length: usize) -> f64 {
    match prev {
        None => tr,
        Some(prev) => (prev * (length as f64 - 1.0) + tr) / length as f64,
    }
}

/// Gaussian kernel weight for an offset of `x` bars.
pub fn gaussian_weight(x: usize, bandwidth: f64) -> f64 {
    if bandwidth <= 0.0 {
        return 1.0;
    }
    let x = x as f64;
    (-(x * x) / (bandwidth * bandwidth * 2.0)).exp()
}

/// Clamp into `[0, 1]`.
pub fn clamp_unit(value: f64) -> f64 {
    value.max(0.0).min(1.0)
}

/// Highest value in a slice-like iterator, `None` when empty.
pub fn highest<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values.into_iter().reduce(f64::max)
}

/// Lowest value in a slice-like iterator, `None` when empty.
pub fn lowest<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values.into_iter().reduce(f64::min)
}
