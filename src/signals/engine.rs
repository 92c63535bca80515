//! Per-market alert engine driven one closed bar at a time.

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::indicators::structure::BalanceCalculator;
use crate::indicators::volatility::WilderAtr;
use crate::indicators::window::RollingWindow;
use crate::models::{AlertEvent, Bar, BalanceReading, IndicatorSnapshot};
use crate::signals::zone::{late_rebound, principal_rebound};
use crate::signals::{AlertFactory, EfmDetector, ReboundParams, Zone};

/// Owns every piece of state for one (symbol, interval) pair.
///
/// Callers must feed bars with strictly increasing timestamps, one at a time.
/// The engine does not reorder or deduplicate; a regression in time is logged
/// and otherwise processed as given.
pub struct AlertsEngine {
    config: EngineConfig,
    alerts: AlertFactory,
    window: RollingWindow,
    atr: WilderAtr,
    efm: EfmDetector,
    balance: BalanceCalculator,
    rebound: ReboundParams,
    zone: Option<Zone>,
    last_balance: Option<BalanceReading>,
    bars_seen: u64,
}

impl AlertsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            alerts: AlertFactory::new(config.symbol.clone(), config.interval.clone()),
            config,
            window: RollingWindow::default(),
            atr: WilderAtr::default(),
            efm: EfmDetector::new(),
            balance: BalanceCalculator::default(),
            rebound: ReboundParams::default(),
            zone: None,
            last_balance: None,
            bars_seen: 0,
        }
    }

    /// Ingest one closed bar and return the alerts it triggered, in detector
    /// order: crossover, balance, principal rebound, late rebound.
    pub fn process(&mut self, bar: &Bar) -> Vec<AlertEvent> {
        if let Some(last) = self.window.last_time() {
            if bar.time <= last {
                warn!(
                    symbol = %self.config.symbol,
                    interval = %self.config.interval,
                    last,
                    received = bar.time,
                    "bar timestamp did not advance"
                );
            }
        }

        let seq = self.bars_seen;
        self.bars_seen += 1;
        self.window.push(bar);
        let atr = self.atr.update(bar);
        let crossover = self.efm.update(bar);

        let mut out = Vec::new();

        if self.config.enable_efm {
            if let Some(direction) = crossover {
                let zone = Zone::from_bar(direction, bar, seq);
                debug!(
                    symbol = %self.config.symbol,
                    direction = ?direction,
                    low = zone.low,
                    high = zone.high,
                    seq,
                    "zone marked"
                );
                self.zone = Some(zone);
                out.push(self.alerts.crossover(direction, bar.close));
            }
        }

        if self.config.enable_balance {
            self.last_balance = self.balance.update(&self.window, atr);
            if let Some(reading) = self.last_balance {
                out.extend(
                    self.alerts
                        .balance(&reading, self.config.balance_threshold, bar.close),
                );
            }
        }

        if let Some(zone) = self.zone {
            if self.config.enable_rebounds {
                if let Some(direction) = principal_rebound(&zone, bar, atr, &self.rebound) {
                    out.push(self.alerts.rebound(direction, &zone, bar.close));
                }
            }
            if self.config.enable_rebounds_late {
                if let Some(direction) = late_rebound(&zone, bar, seq, atr, &self.rebound) {
                    out.push(self.alerts.late_rebound(direction, &zone, bar.close));
                }
            }
        }

        for alert in &out {
            debug!(
                symbol = %alert.symbol,
                interval = %alert.interval,
                kind = alert.kind.as_str(),
                title = %alert.title,
                price = alert.price,
                "alert triggered"
            );
        }

        out
    }

    /// Replay history to build state, discarding the alerts it would raise.
    pub fn warm_up<'a, I>(&mut self, bars: I) -> usize
    where
        I: IntoIterator<Item = &'a Bar>,
    {
        let mut count = 0;
        for bar in bars {
            self.process(bar);
            count += 1;
        }
        count
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    pub fn last_time(&self) -> Option<i64> {
        self.window.last_time()
    }

    pub fn bars_seen(&self) -> u64 {
        self.bars_seen
    }

    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            ema_fast: self.efm.fast(),
            ema_slow: self.efm.slow(),
            bias: self.efm.bias(),
            atr: self.atr.value(),
            balance: self.last_balance,
            bars_seen: self.bars_seen,
        }
    }
}
