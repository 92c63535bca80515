//! Alert assembly for each detector

use crate::models::{AlertEvent, AlertKind, BalanceReading, Severity};
use crate::signals::{Direction, Zone};

/// Stamps alerts with the engine's symbol and interval.
#[derive(Debug, Clone)]
pub struct AlertFactory {
    symbol: String,
    interval: String,
}

impl AlertFactory {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
        }
    }

    pub fn crossover(&self, direction: Direction, close: f64) -> AlertEvent {
        let (title, message) = match direction {
            Direction::Long => ("EFMUS Long", format!("EMA13>EMA48. C={:.6}", close)),
            Direction::Short => ("EFMUS Short", format!("EMA13<EMA48. C={:.6}", close)),
        };
        self.build(title, message, direction.severity(), close, AlertKind::Efm)
    }

    /// Bull and bear checks are independent, so a non-positive threshold can
    /// yield both on the same bar.
    pub fn balance(&self, reading: &BalanceReading, threshold: f64, close: f64) -> Vec<AlertEvent> {
        let mut alerts = Vec::new();
        if reading.score >= threshold {
            alerts.push(self.build(
                "Balance Bull",
                format!("{:.2} ≥ {}", reading.score, threshold),
                Severity::Bull,
                close,
                AlertKind::Balance,
            ));
        }
        if reading.score <= -threshold {
            alerts.push(self.build(
                "Balance Bear",
                format!("{:.2} ≤ -{}", reading.score, threshold),
                Severity::Bear,
                close,
                AlertKind::Balance,
            ));
        }
        alerts
    }

    pub fn rebound(&self, direction: Direction, zone: &Zone, close: f64) -> AlertEvent {
        self.build(
            format!("Rebound {} (principal)", direction.label()),
            format!("active zone [{:.6}, {:.6}]", zone.low, zone.high),
            direction.severity(),
            close,
            AlertKind::Rebound,
        )
    }

    pub fn late_rebound(&self, direction: Direction, zone: &Zone, close: f64) -> AlertEvent {
        self.build(
            format!("Rebound {} (late)", direction.label()),
            format!("late zone [{:.6}, {:.6}]", zone.low, zone.high),
            direction.severity(),
            close,
            AlertKind::ReboundLate,
        )
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> &str {
        &self.interval
    }

    fn build(
        &self,
        title: impl Into<String>,
        message: String,
        severity: Severity,
        price: f64,
        kind: AlertKind,
    ) -> AlertEvent {
        AlertEvent::new(&self.symbol, &self.interval, title, message, severity, price, kind)
    }
}
