//! Fixed-capacity bar history

use std::collections::VecDeque;

use crate::common::math;
use crate::models::Bar;

/// Default number of bars retained per engine.
pub const WINDOW_CAPACITY: usize = 600;

/// Ring buffers of the most recent bars, one per field, oldest evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    opens: VecDeque<f64>,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    closes: VecDeque<f64>,
    volumes: VecDeque<f64>,
    times: VecDeque<i64>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            opens: VecDeque::with_capacity(capacity),
            highs: VecDeque::with_capacity(capacity),
            lows: VecDeque::with_capacity(capacity),
            closes: VecDeque::with_capacity(capacity),
            volumes: VecDeque::with_capacity(capacity),
            times: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, bar: &Bar) {
        if self.closes.len() == self.capacity {
            self.opens.pop_front();
            self.highs.pop_front();
            self.lows.pop_front();
            self.closes.pop_front();
            self.volumes.pop_front();
            self.times.pop_front();
        }
        self.opens.push_back(bar.open);
        self.highs.push_back(bar.high);
        self.lows.push_back(bar.low);
        self.closes.push_back(bar.close);
        self.volumes.push_back(bar.volume);
        self.times.push_back(bar.time);
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last_close(&self) -> Option<f64> {
        self.closes.back().copied()
    }

    pub fn last_time(&self) -> Option<i64> {
        self.times.back().copied()
    }

    /// Closes ordered newest first.
    pub fn recent_closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.closes.iter().rev().copied()
    }

    /// Highest high over the last `n` bars (fewer if history is short).
    pub fn highest_high(&self, n: usize) -> Option<f64> {
        math::highest(self.highs.iter().rev().take(n).copied())
    }

    /// Lowest low over the last `n` bars (fewer if history is short).
    pub fn lowest_low(&self, n: usize) -> Option<f64> {
        math::lowest(self.lows.iter().rev().take(n).copied())
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(WINDOW_CAPACITY)
    }
}
