//! Zone marking and rebound detection
//!
//! A crossover marks the body of its candle as the active zone. Later candles
//! whose wick re-tests that zone produce rebound alerts: the principal check
//! runs on every bar, the late check only once the zone has aged.

use crate::models::Bar;
use crate::signals::Direction;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReboundParams {
    pub small_body_ratio: f64,
    pub wick_ratio: f64,
    pub impulse_body_ratio: f64,
    pub impulse_atr: f64,
    pub tolerance_atr: f64,
    pub touch_atr: f64,
    pub late_offset_atr: f64,
    pub late_min_bars: u64,
    pub late_fraction: f64,
}

impl Default for ReboundParams {
    fn default() -> Self {
        Self {
            small_body_ratio: 0.55,
            wick_ratio: 0.35,
            impulse_body_ratio: 0.60,
            impulse_atr: 0.35,
            tolerance_atr: 0.03,
            touch_atr: 0.02,
            late_offset_atr: 0.02,
            late_min_bars: 12,
            late_fraction: 0.25,
        }
    }
}

/// Body range of the candle behind the most recent crossover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub direction: Direction,
    pub low: f64,
    pub high: f64,
    /// Engine bar sequence number at which the zone was marked.
    pub marked_at: u64,
}

impl Zone {
    pub fn from_bar(direction: Direction, bar: &Bar, marked_at: u64) -> Self {
        Self {
            direction,
            low: bar.body_low(),
            high: bar.body_high(),
            marked_at,
        }
    }

    pub fn size(&self) -> f64 {
        (self.high - self.low).max(0.0)
    }

    /// Band re-tested by late rebounds: the quarter of the body nearest the
    /// signal's continuation side, padded by `offset`.
    pub fn late_band(&self, fraction: f64, offset: f64) -> (f64, f64) {
        let size = self.size();
        match self.direction {
            Direction::Long => (self.high - size * fraction - offset, self.high + offset),
            Direction::Short => (self.low - offset, self.low + size * fraction + offset),
        }
    }
}

/// Candle geometry used by both rebound variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleShape {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub range: f64,
    pub body: f64,
    pub upper_wick: f64,
    pub lower_wick: f64,
}

impl CandleShape {
    pub fn of(bar: &Bar) -> Self {
        Self {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            range: bar.high - bar.low,
            body: (bar.close - bar.open).abs(),
            upper_wick: bar.high - bar.body_high(),
            lower_wick: bar.body_low() - bar.low,
        }
    }

    pub fn is_small_body(&self, p: &ReboundParams) -> bool {
        self.body <= p.small_body_ratio * self.range
    }

    pub fn has_long_lower_wick(&self, p: &ReboundParams) -> bool {
        self.lower_wick >= p.wick_ratio * self.range
    }

    pub fn has_long_upper_wick(&self, p: &ReboundParams) -> bool {
        self.upper_wick >= p.wick_ratio * self.range
    }

    pub fn is_impulse(&self, direction: Direction, atr: f64, p: &ReboundParams) -> bool {
        let moved = match direction {
            Direction::Long => self.close - self.open,
            Direction::Short => self.open - self.close,
        };
        self.body >= p.impulse_body_ratio * self.range || moved >= p.impulse_atr * atr
    }

    /// Whether the wick on the zone side lands inside `[low, high]` and
    /// penetrates at least `touch_min` past the near edge.
    pub fn touches(&self, direction: Direction, low: f64, high: f64, touch_min: f64) -> bool {
        match direction {
            Direction::Long => {
                let penetration = (high - self.low).max(0.0);
                self.low >= low && self.low <= high && penetration >= touch_min
            }
            Direction::Short => {
                let penetration = (self.high - low).max(0.0);
                self.high <= high && self.high >= low && penetration >= touch_min
            }
        }
    }

    /// Rejection candle or impulse off a touched band, in `direction`.
    fn confirms(&self, direction: Direction, touched: bool, atr: f64, p: &ReboundParams) -> bool {
        if !touched {
            return false;
        }
        let rejection = match direction {
            Direction::Long => {
                self.close >= self.open && self.is_small_body(p) && self.has_long_lower_wick(p)
            }
            Direction::Short => {
                self.close <= self.open && self.is_small_body(p) && self.has_long_upper_wick(p)
            }
        };
        rejection || self.is_impulse(direction, atr, p)
    }
}

/// Principal rebound against the zone body widened by `tolerance_atr`.
pub fn principal_rebound(zone: &Zone, bar: &Bar, atr: f64, p: &ReboundParams) -> Option<Direction> {
    let shape = CandleShape::of(bar);
    if shape.range <= 0.0 {
        return None;
    }
    let eps = p.tolerance_atr * atr;
    let touch_min = p.touch_atr * atr;
    // The penetration is measured from the raw zone edge; only the bounds widen.
    let touched = match zone.direction {
        Direction::Long => {
            shape.low >= zone.low - eps
                && shape.low <= zone.high + eps
                && (zone.high - shape.low).max(0.0) >= touch_min
        }
        Direction::Short => {
            shape.high <= zone.high + eps
                && shape.high >= zone.low - eps
                && (shape.high - zone.low).max(0.0) >= touch_min
        }
    };
    shape
        .confirms(zone.direction, touched, atr, p)
        .then_some(zone.direction)
}

/// Late rebound against the shifted quarter band, once `late_min_bars` have
/// elapsed since the zone was marked.
pub fn late_rebound(
    zone: &Zone,
    bar: &Bar,
    seq: u64,
    atr: f64,
    p: &ReboundParams,
) -> Option<Direction> {
    if seq.saturating_sub(zone.marked_at) < p.late_min_bars {
        return None;
    }
    let shape = CandleShape::of(bar);
    if shape.range <= 0.0 {
        return None;
    }
    let (low, high) = zone.late_band(p.late_fraction, p.late_offset_atr * atr);
    let touched = shape.touches(zone.direction, low, high, p.touch_atr * atr);
    shape
        .confirms(zone.direction, touched, atr, p)
        .then_some(zone.direction)
}
