use serde::{Deserialize, Serialize};

/// One closed bar as consumed by the alert engine.
///
/// `time` is the bar-close epoch in seconds. The wire form uses the short
/// `t/o/h/l/c/v` names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(rename = "t")]
    pub time: i64,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
}

impl Bar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn hl2(&self) -> f64 {
        0.5 * (self.high + self.low)
    }

    pub fn body_low(&self) -> f64 {
        self.open.min(self.close)
    }

    pub fn body_high(&self) -> f64 {
        self.open.max(self.close)
    }
}

/// Exchange candle keyed by its open time, as served to chart clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Convert into an engine bar stamped with its close time.
    pub fn into_closed_bar(self, step_secs: i64) -> Bar {
        Bar::new(
            self.time + step_secs,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        )
    }
}
