use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Bull,
    Bear,
    Info,
}

/// Detector that produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Efm,
    Balance,
    Rebound,
    ReboundLate,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Efm => "efm",
            AlertKind::Balance => "balance",
            AlertKind::Rebound => "rebound",
            AlertKind::ReboundLate => "rebound_late",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub id: String,
    pub ts: i64,
    pub symbol: String,
    pub interval: String,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub price: f64,
    pub kind: AlertKind,
}

impl AlertEvent {
    /// Build an alert stamped with a fresh id and the current wall clock.
    pub fn new(
        symbol: &str,
        interval: &str,
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        price: f64,
        kind: AlertKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ts: Utc::now().timestamp(),
            symbol: symbol.to_string(),
            interval: interval.to_string(),
            title: title.into(),
            message: message.into(),
            severity,
            price,
            kind,
        }
    }

    /// Plain-text rendering used by chat notifiers.
    pub fn to_text(&self) -> String {
        format!(
            "[{} {}] {}\n{}\nPrice: {}",
            self.symbol, self.interval, self.title, self.message, self.price
        )
    }
}
