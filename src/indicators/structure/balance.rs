//! Balance / breakout score
//!
//! Compares where price sits against the recent breakout levels, relative to
//! the width of a kernel regression envelope. Positive scores lean bullish,
//! negative lean bearish, bounded by `[-score_scale, score_scale]`.

use crate::common::math;
use crate::indicators::volatility::KernelEstimator;
use crate::indicators::window::RollingWindow;
use crate::models::BalanceReading;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceParams {
    pub bandwidth: f64,
    pub kernel_size: usize,
    pub envelope_mult: f64,
    pub score_scale: f64,
    pub proximity_width: f64,
    pub proximity_weight: f64,
    pub opportunity_weight: f64,
    pub range_len: usize,
    pub mae_len: usize,
    pub breakout_buffer_atr: f64,
}

impl Default for BalanceParams {
    fn default() -> Self {
        Self {
            bandwidth: 8.0,
            kernel_size: 500,
            envelope_mult: 3.0,
            score_scale: 100.0,
            proximity_width: 1.0,
            proximity_weight: 0.60,
            opportunity_weight: 0.40,
            range_len: 16,
            mae_len: 499,
            breakout_buffer_atr: 0.20,
        }
    }
}

/// Inputs of the score combination for a single bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceLevels {
    pub close: f64,
    pub center: f64,
    pub upper_break: f64,
    pub lower_break: f64,
    pub envelope_width: f64,
}

/// Combine proximity and opportunity on both sides into one score.
pub fn balance_score(levels: &BalanceLevels, params: &BalanceParams) -> f64 {
    let scale_w = (params.proximity_width * levels.envelope_width).max(math::EPSILON);
    let dist_up = levels.upper_break - levels.close;
    let dist_dn = levels.close - levels.lower_break;

    let bull_prox = if dist_up <= 0.0 {
        1.0
    } else {
        (1.0 - dist_up / scale_w).max(0.0)
    };
    let bear_prox = if dist_dn <= 0.0 {
        1.0
    } else {
        (1.0 - dist_dn / scale_w).max(0.0)
    };
    let bull_opp = math::clamp_unit((levels.center - levels.lower_break) / scale_w);
    let bear_opp = math::clamp_unit((levels.upper_break - levels.center) / scale_w);

    let den = (params.proximity_weight + params.opportunity_weight).max(1e-9);
    let bull = (params.proximity_weight * bull_prox + params.opportunity_weight * bull_opp) / den;
    let bear = (params.proximity_weight * bear_prox + params.opportunity_weight * bear_opp) / den;

    (bull - bear) * params.score_scale
}

/// Stateful calculator holding the kernel table and the smoothed deviation.
#[derive(Debug, Clone)]
pub struct BalanceCalculator {
    params: BalanceParams,
    kernel: KernelEstimator,
    mae: Option<f64>,
}

impl BalanceCalculator {
    pub fn new(params: BalanceParams) -> Self {
        Self {
            kernel: KernelEstimator::new(params.bandwidth, params.kernel_size),
            params,
            mae: None,
        }
    }

    /// Score the newest bar in `window`.
    ///
    /// Returns `None` while the window is empty. The deviation average only
    /// advances on bars where a center could be computed.
    pub fn update(&mut self, window: &RollingWindow, atr: f64) -> Option<BalanceReading> {
        let close = window.last_close()?;
        let hh = window.highest_high(self.params.range_len)?;
        let ll = window.lowest_low(self.params.range_len)?;
        let upper_break = hh + self.params.breakout_buffer_atr * atr;
        let lower_break = ll - self.params.breakout_buffer_atr * atr;

        let center = self.kernel.estimate(window.recent_closes())?;
        let mae = math::rma_warm(self.mae, (close - center).abs(), self.params.mae_len);
        self.mae = Some(mae);
        let envelope_width = (mae * self.params.envelope_mult).max(math::EPSILON);

        let levels = BalanceLevels {
            close,
            center,
            upper_break,
            lower_break,
            envelope_width,
        };
        let score = balance_score(&levels, &self.params);

        Some(BalanceReading {
            score,
            upper_break,
            lower_break,
            center,
            envelope_width,
            atr,
        })
    }

    pub fn mae(&self) -> Option<f64> {
        self.mae
    }

    pub fn params(&self) -> &BalanceParams {
        &self.params
    }
}

impl Default for BalanceCalculator {
    fn default() -> Self {
        Self::new(BalanceParams::default())
    }
}
