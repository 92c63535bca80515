//! EMA (Exponential Moving Average) indicator

use crate::common::math;

/// Running EMA folded over successive samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ema {
    period: usize,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            value: None,
        }
    }

    /// Fold one sample in and return the updated average.
    pub fn update(&mut self, sample: f64) -> f64 {
        let next = math::ema(self.value, sample, self.period);
        self.value = Some(next);
        next
    }

    /// `None` until the first sample.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Direction of a fast/slow crossing between two consecutive bars.
///
/// Returns `Some(1)` on an upward cross, `Some(-1)` on a downward cross and
/// `Some(0)` when the relative order did not change.
pub fn check_ema_cross(
    prev_fast: Option<f64>,
    prev_slow: Option<f64>,
    fast: f64,
    slow: f64,
) -> Option<i32> {
    let (prev_fast, prev_slow) = (prev_fast?, prev_slow?);
    if prev_fast <= prev_slow && fast > slow {
        Some(1)
    } else if prev_fast >= prev_slow && fast < slow {
        Some(-1)
    } else {
        Some(0)
    }
}
