use serde::{Deserialize, Serialize};

/// Output of the balance/breakout calculator for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceReading {
    pub score: f64,
    pub upper_break: f64,
    pub lower_break: f64,
    /// Kernel regression center of recent closes.
    pub center: f64,
    pub envelope_width: f64,
    pub atr: f64,
}

/// Read-only view of an engine's indicator state after the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_fast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_slow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<BalanceReading>,
    pub bars_seen: u64,
}
