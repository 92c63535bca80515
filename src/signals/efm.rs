//! EFM crossover detector
//!
//! EMA13 crossing EMA48 on close, filtered by price sitting on the right side
//! of an EMA100 of the bar midpoint.

use crate::indicators::trend::{check_ema_cross, Ema};
use crate::models::Bar;
use crate::signals::Direction;

pub const FAST_PERIOD: usize = 13;
pub const SLOW_PERIOD: usize = 48;
pub const BIAS_PERIOD: usize = 100;

#[derive(Debug, Clone)]
pub struct EfmDetector {
    fast: Ema,
    slow: Ema,
    bias: Ema,
}

impl EfmDetector {
    pub fn new() -> Self {
        Self {
            fast: Ema::new(FAST_PERIOD),
            slow: Ema::new(SLOW_PERIOD),
            bias: Ema::new(BIAS_PERIOD),
        }
    }

    /// Advance all three averages with `bar` and report a filtered cross.
    ///
    /// Nothing fires until both averages have a previous value.
    pub fn update(&mut self, bar: &Bar) -> Option<Direction> {
        let bias = self.bias.update(bar.hl2());
        let (prev_fast, prev_slow) = (self.fast.value(), self.slow.value());
        let fast = self.fast.update(bar.close);
        let slow = self.slow.update(bar.close);

        match check_ema_cross(prev_fast, prev_slow, fast, slow)? {
            1 if bar.close > bias => Some(Direction::Long),
            -1 if bar.close < bias => Some(Direction::Short),
            _ => None,
        }
    }

    pub fn fast(&self) -> Option<f64> {
        self.fast.value()
    }

    pub fn slow(&self) -> Option<f64> {
        self.slow.value()
    }

    pub fn bias(&self) -> Option<f64> {
        self.bias.value()
    }
}

impl Default for EfmDetector {
    fn default() -> Self {
        Self::new()
    }
}
