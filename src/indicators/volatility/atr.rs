//! ATR (Average True Range) indicator

use crate::common::math;
use crate::models::Bar;

pub const DEFAULT_ATR_PERIOD: usize = 14;

/// Wilder-smoothed ATR, updated once per closed bar.
///
/// The first bar seeds the average with its plain high-low range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WilderAtr {
    period: usize,
    value: Option<f64>,
    prev_close: Option<f64>,
}

impl WilderAtr {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            value: None,
            prev_close: None,
        }
    }

    pub fn update(&mut self, bar: &Bar) -> f64 {
        let tr = math::true_range(bar.high, bar.low, self.prev_close);
        let atr = math::atr_wilder(self.value, tr, self.period);
        self.value = Some(atr);
        self.prev_close = Some(bar.close);
        atr
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn prev_close(&self) -> Option<f64> {
        self.prev_close
    }
}

impl Default for WilderAtr {
    fn default() -> Self {
        Self::new(DEFAULT_ATR_PERIOD)
    }
}
