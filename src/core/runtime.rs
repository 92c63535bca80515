//! Alert workers: one engine per market, fed from the shared kline streams.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{EngineConfig, Settings};
use crate::error::{FeedError, MarketDataError};
use crate::metrics::Metrics;
use crate::models::{AlertEvent, Bar, Candle};
use crate::services::mexc::{interval_seconds, KlineUpdate, StreamHub};
use crate::services::{ClosedBarFeed, MarketDataProvider, Notifier};
use crate::signals::AlertsEngine;

/// Candles already closed at `now`, sorted and deduplicated by open time.
///
/// The newest candle is dropped when it may still be forming.
pub fn closed_history(mut candles: Vec<Candle>, step_secs: i64, now: i64) -> Vec<Candle> {
    candles.sort_by_key(|c| c.time);
    candles.dedup_by_key(|c| c.time);
    if candles.last().is_some_and(|c| c.time + step_secs > now) {
        candles.pop();
    }
    candles
}

/// Binds one engine to its feed, a notifier and the shared metrics.
pub struct AlertWorker {
    engine: AlertsEngine,
    feed: ClosedBarFeed,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<Metrics>,
}

impl AlertWorker {
    pub fn new(config: EngineConfig, notifier: Arc<dyn Notifier>, metrics: Arc<Metrics>) -> Self {
        let feed = ClosedBarFeed::new(&config.interval);
        Self {
            engine: AlertsEngine::new(config),
            feed,
            notifier,
            metrics,
        }
    }

    pub fn engine(&self) -> &AlertsEngine {
        &self.engine
    }

    pub fn feed(&self) -> &ClosedBarFeed {
        &self.feed
    }

    /// Replay closed history into the engine; alerts raised here are dropped.
    pub async fn warm_up(
        &mut self,
        provider: &dyn MarketDataProvider,
        bars: usize,
    ) -> Result<usize, MarketDataError> {
        if bars == 0 {
            return Ok(0);
        }
        let config = self.engine.config().clone();
        let step = interval_seconds(&config.interval);
        let candles = provider
            .get_candles(&config.symbol, &config.interval, bars + 1)
            .await?;
        let history = closed_history(candles, step, chrono::Utc::now().timestamp());

        let closed: Vec<Bar> = history.iter().map(|c| c.into_closed_bar(step)).collect();
        let count = self.engine.warm_up(&closed);
        if let Some(last) = history.last() {
            self.feed = ClosedBarFeed::new(&config.interval).with_last_closed(last.time);
        }
        info!(
            symbol = %config.symbol,
            interval = %config.interval,
            bars = count,
            "engine warmed up"
        );
        Ok(count)
    }

    /// Feed one stream update; returns the alerts emitted if it closed a bar.
    pub async fn handle_update(&mut self, update: KlineUpdate) -> Vec<AlertEvent> {
        let bar = match self.feed.push(update) {
            Ok(Some(bar)) => bar,
            Ok(None) => return Vec::new(),
            Err(e @ FeedError::OutOfOrder { .. }) => {
                self.metrics.feed_rejected_bars_total.inc();
                debug!(symbol = %self.engine.config().symbol, error = %e, "kline update rejected");
                return Vec::new();
            }
            Err(e) => {
                warn!(symbol = %self.engine.config().symbol, error = %e, "kline update failed");
                return Vec::new();
            }
        };
        self.process_bar(&bar).await
    }

    async fn process_bar(&mut self, bar: &Bar) -> Vec<AlertEvent> {
        let config = self.engine.config();
        self.metrics
            .bars_processed_total
            .with_label_values(&[config.symbol.as_str(), config.interval.as_str()])
            .inc();

        let alerts = self.engine.process(bar);
        for alert in &alerts {
            self.metrics
                .alerts_emitted_total
                .with_label_values(&[alert.kind.as_str()])
                .inc();
            info!(
                symbol = %alert.symbol,
                interval = %alert.interval,
                kind = alert.kind.as_str(),
                price = alert.price,
                "{}",
                alert.title
            );
            if let Err(e) = self.notifier.notify(alert).await {
                self.metrics.notifications_failed_total.inc();
                error!(alert_id = %alert.id, error = %e, "Failed to deliver alert");
            }
        }
        alerts
    }

    /// Consume updates until the stream closes.
    pub async fn run(mut self, mut updates: broadcast::Receiver<KlineUpdate>) {
        loop {
            match updates.recv().await {
                Ok(update) => {
                    self.handle_update(update).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        symbol = %self.engine.config().symbol,
                        skipped,
                        "alert worker lagged behind the stream"
                    );
                }
                Err(RecvError::Closed) => {
                    info!(symbol = %self.engine.config().symbol, "kline stream closed");
                    break;
                }
            }
        }
    }
}

/// Spawns one alert worker per configured market on a shared stream hub.
pub struct AlertRuntime {
    hub: Arc<StreamHub>,
    market_data: Arc<dyn MarketDataProvider>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<Metrics>,
    warmup_bars: usize,
}

impl AlertRuntime {
    pub fn new(
        hub: Arc<StreamHub>,
        market_data: Arc<dyn MarketDataProvider>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            hub,
            market_data,
            notifier,
            metrics,
            warmup_bars: 0,
        }
    }

    pub fn with_warmup_bars(mut self, bars: usize) -> Self {
        self.warmup_bars = bars;
        self
    }

    pub fn hub(&self) -> &Arc<StreamHub> {
        &self.hub
    }

    /// Warm up, subscribe and run a worker for one market.
    ///
    /// The stream is subscribed before warm-up so updates arriving meanwhile
    /// are buffered; those already covered by history are rejected as stale.
    pub async fn spawn_worker(&self, config: EngineConfig) -> JoinHandle<()> {
        let stream = self.hub.get_or_create(&config.symbol, &config.interval).await;
        let updates = stream.subscribe();
        stream.start().await;

        let mut worker = AlertWorker::new(config, self.notifier.clone(), self.metrics.clone());
        let market_data = self.market_data.clone();
        let warmup_bars = self.warmup_bars;
        tokio::spawn(async move {
            if let Err(e) = worker.warm_up(market_data.as_ref(), warmup_bars).await {
                warn!(
                    symbol = %worker.engine().config().symbol,
                    error = %e,
                    "warm-up failed; starting cold"
                );
            }
            worker.run(updates).await;
        })
    }

    /// Spawn workers for every (symbol, interval) in `settings`.
    pub async fn start(&self, settings: &Settings) -> Vec<JoinHandle<()>> {
        let configs = settings.engine_configs();
        info!(workers = configs.len(), "starting alert workers");
        let mut handles = Vec::with_capacity(configs.len());
        for config in configs {
            handles.push(self.spawn_worker(config).await);
        }
        handles
    }

    pub async fn shutdown(&self) {
        self.hub.stop_all().await;
    }
}
