//! Long-lived kline websocket per (symbol, interval) with fan-out to local
//! subscribers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use backon::{BackoffBuilder, ExponentialBackoff, ExponentialBuilder};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, trace, warn};

use super::messages::{parse_stream_message, KlineUpdate, RequestMessage, StreamEvent};
use crate::error::FeedError;
use crate::metrics::Metrics;

/// Per-subscriber buffer; slower consumers lose the oldest updates.
pub const SUBSCRIBER_BUFFER: usize = 1024;
const MIN_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(10);
const STALE_GRACE: Duration = Duration::from_secs(5);
const MIN_PING_INTERVAL: Duration = Duration::from_secs(1);

pub type StreamKey = (String, String);

fn reconnect_backoff() -> ExponentialBackoff {
    ExponentialBuilder::default()
        .with_min_delay(MIN_BACKOFF)
        .with_max_delay(MAX_BACKOFF)
        .with_factor(2.0)
        .without_max_times()
        .build()
}

/// Streams one market's klines and republishes every update.
pub struct KlineStreamer {
    symbol: String,
    interval: String,
    ws_url: String,
    ping_interval: Duration,
    sender: broadcast::Sender<KlineUpdate>,
    connected: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
    metrics: Option<Arc<Metrics>>,
}

impl KlineStreamer {
    pub fn new(
        symbol: impl Into<String>,
        interval: impl Into<String>,
        ws_url: impl Into<String>,
        ping_interval: Duration,
    ) -> Self {
        let (sender, _) = broadcast::channel(SUBSCRIBER_BUFFER);
        let (shutdown, _) = watch::channel(false);
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            ws_url: ws_url.into(),
            ping_interval: ping_interval.max(MIN_PING_INTERVAL),
            sender,
            connected: Arc::new(AtomicBool::new(false)),
            shutdown,
            task: Mutex::new(None),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn key(&self) -> StreamKey {
        (self.symbol.clone(), self.interval.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<KlineUpdate> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn ping_interval(&self) -> Duration {
        self.ping_interval
    }

    /// Spawn the connection task unless one is already running.
    pub async fn start(&self) {
        let mut task = self.task.lock().await;
        if task.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }
        self.shutdown.send_replace(false);
        let worker = StreamWorker {
            symbol: self.symbol.clone(),
            interval: self.interval.clone(),
            ws_url: self.ws_url.clone(),
            ping_interval: self.ping_interval,
            sender: self.sender.clone(),
            connected: self.connected.clone(),
            shutdown: self.shutdown.subscribe(),
            metrics: self.metrics.clone(),
        };
        *task = Some(tokio::spawn(worker.run()));
    }

    /// Signal the connection task to close and wait for it.
    pub async fn stop(&self) {
        self.shutdown.send_replace(true);
        if let Some(handle) = self.task.lock().await.take() {
            let _ = handle.await;
        }
        info!(symbol = %self.symbol, interval = %self.interval, "kline stream stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

struct StreamWorker {
    symbol: String,
    interval: String,
    ws_url: String,
    ping_interval: Duration,
    sender: broadcast::Sender<KlineUpdate>,
    connected: Arc<AtomicBool>,
    shutdown: watch::Receiver<bool>,
    metrics: Option<Arc<Metrics>>,
}

impl StreamWorker {
    async fn run(self) {
        let mut backoff = reconnect_backoff();
        while !self.stopping() {
            let mut established = false;
            match self.session(&mut established).await {
                Ok(()) => debug!(symbol = %self.symbol, "kline session ended"),
                Err(e) => warn!(
                    symbol = %self.symbol,
                    interval = %self.interval,
                    error = %e,
                    "kline stream error; reconnecting"
                ),
            }
            self.set_connected(false);
            if established {
                backoff = reconnect_backoff();
            }
            if self.stopping() {
                break;
            }
            let delay = backoff.next().unwrap_or(MAX_BACKOFF);
            let mut shutdown = self.shutdown.clone();
            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.changed() => {}
            }
        }
    }

    /// Stop requested, or the owning streamer is gone.
    fn stopping(&self) -> bool {
        *self.shutdown.borrow() || self.shutdown.has_changed().is_err()
    }

    fn set_connected(&self, connected: bool) {
        let was = self.connected.swap(connected, Ordering::SeqCst);
        if was != connected {
            if let Some(metrics) = &self.metrics {
                if connected {
                    metrics.websocket_connected.inc();
                } else {
                    metrics.websocket_connected.dec();
                }
            }
        }
    }

    async fn session(&self, established: &mut bool) -> Result<(), FeedError> {
        let (ws, _) = connect_async(self.ws_url.as_str()).await?;
        let (mut write, mut read) = ws.split();

        let subscribe = serde_json::to_string(&RequestMessage::subscribe_kline(
            &self.symbol,
            &self.interval,
        ))?;
        write.send(Message::Text(subscribe)).await?;
        *established = true;
        self.set_connected(true);
        info!(symbol = %self.symbol, interval = %self.interval, "subscribed to kline stream");

        let ping = serde_json::to_string(&RequestMessage::Ping)?;
        let stale_after = self.ping_interval + STALE_GRACE;
        let mut ping_timer = tokio::time::interval(self.ping_interval);
        let mut last_seen = Instant::now();
        let mut shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    let unsubscribe = serde_json::to_string(&RequestMessage::unsubscribe_kline(
                        &self.symbol,
                        &self.interval,
                    ))?;
                    let _ = write.send(Message::Text(unsubscribe)).await;
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }
                _ = ping_timer.tick() => {
                    if last_seen.elapsed() > stale_after {
                        return Err(FeedError::Stale(stale_after.as_secs()));
                    }
                    if let Err(e) = write.send(Message::Text(ping.clone())).await {
                        debug!(symbol = %self.symbol, error = %e, "ping failed");
                    }
                }
                frame = read.next() => {
                    let Some(frame) = frame else {
                        return Err(FeedError::ConnectionClosed);
                    };
                    last_seen = Instant::now();
                    match frame? {
                        Message::Text(text) => self.handle_text(&text),
                        Message::Ping(payload) => write.send(Message::Pong(payload)).await?,
                        Message::Close(_) => return Err(FeedError::ConnectionClosed),
                        _ => {}
                    }
                }
            }
        }
    }

    fn handle_text(&self, text: &str) {
        match parse_stream_message(text, &self.symbol, &self.interval) {
            Ok(StreamEvent::Kline(update)) => {
                // No receivers is not an error for a broadcast stream.
                let _ = self.sender.send(update);
            }
            Ok(StreamEvent::Pong) => trace!(symbol = %self.symbol, "pong"),
            Ok(StreamEvent::Other(channel)) => trace!(channel = %channel, "ignored channel"),
            Err(e) => debug!(symbol = %self.symbol, error = %e, "malformed stream message"),
        }
    }
}

/// Shares one streamer per (symbol, interval) across consumers.
pub struct StreamHub {
    ws_url: String,
    ping_interval: Duration,
    metrics: Option<Arc<Metrics>>,
    streams: RwLock<HashMap<StreamKey, Arc<KlineStreamer>>>,
}

impl StreamHub {
    pub fn new(ws_url: impl Into<String>, ping_interval: Duration) -> Self {
        Self {
            ws_url: ws_url.into(),
            ping_interval,
            metrics: None,
            streams: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn get_or_create(&self, symbol: &str, interval: &str) -> Arc<KlineStreamer> {
        let key = (symbol.to_string(), interval.to_string());
        if let Some(stream) = self.streams.read().await.get(&key) {
            return stream.clone();
        }
        let mut streams = self.streams.write().await;
        streams
            .entry(key)
            .or_insert_with(|| {
                let mut streamer =
                    KlineStreamer::new(symbol, interval, self.ws_url.clone(), self.ping_interval);
                if let Some(metrics) = &self.metrics {
                    streamer = streamer.with_metrics(metrics.clone());
                }
                Arc::new(streamer)
            })
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.streams.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.streams.read().await.is_empty()
    }

    pub async fn stop_all(&self) {
        let streams: Vec<Arc<KlineStreamer>> =
            self.streams.read().await.values().cloned().collect();
        for stream in streams {
            stream.stop().await;
        }
    }
}
