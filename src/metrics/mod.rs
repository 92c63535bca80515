//! Prometheus metrics shared by the HTTP surface and the alert workers.

use prometheus::{
    Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: Counter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: Gauge,
    pub bars_processed_total: CounterVec,
    pub alerts_emitted_total: CounterVec,
    pub notifications_failed_total: Counter,
    pub feed_rejected_bars_total: Counter,
    pub websocket_connected: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            Counter::with_opts(Opts::new("http_requests_total", "Total HTTP requests served"))?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight = Gauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "HTTP requests currently being handled",
        ))?;
        let bars_processed_total = CounterVec::new(
            Opts::new("bars_processed_total", "Closed bars fed to alert engines"),
            &["symbol", "interval"],
        )?;
        let alerts_emitted_total = CounterVec::new(
            Opts::new("alerts_emitted_total", "Alerts emitted by detector kind"),
            &["kind"],
        )?;
        let notifications_failed_total = Counter::with_opts(Opts::new(
            "notifications_failed_total",
            "Alert notifications that could not be delivered",
        ))?;
        let feed_rejected_bars_total = Counter::with_opts(Opts::new(
            "feed_rejected_bars_total",
            "Kline updates rejected as out of order",
        ))?;
        let websocket_connected = Gauge::with_opts(Opts::new(
            "websocket_connected",
            "Number of exchange streams currently connected",
        ))?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(bars_processed_total.clone()))?;
        registry.register(Box::new(alerts_emitted_total.clone()))?;
        registry.register(Box::new(notifications_failed_total.clone()))?;
        registry.register(Box::new(feed_rejected_bars_total.clone()))?;
        registry.register(Box::new(websocket_connected.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            bars_processed_total,
            alerts_emitted_total,
            notifications_failed_total,
            feed_rejected_bars_total,
            websocket_connected,
        })
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
