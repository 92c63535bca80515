//! Zonewatch Alerts Worker
//!
//! Streams klines for every configured market, runs one alert engine per
//! (symbol, interval) and delivers alerts to Telegram or the log.

use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use zonewatch::config::Settings;
use zonewatch::core::runtime::AlertRuntime;
use zonewatch::logging;
use zonewatch::metrics::Metrics;
use zonewatch::services::mexc::{MexcRestClient, StreamHub};
use zonewatch::services::{LogNotifier, MarketDataProvider, Notifier, TelegramNotifier};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let settings = Settings::from_env()?;
    let env = zonewatch::config::get_environment();
    info!("Starting Zonewatch Alerts Worker");
    info!(environment = %env, "Environment");
    info!(
        symbols = ?settings.symbols,
        intervals = ?settings.intervals,
        "Markets"
    );

    let metrics = Arc::new(Metrics::new()?);
    let hub = Arc::new(
        StreamHub::new(
            settings.ws_url.clone(),
            Duration::from_secs(settings.ping_interval_secs),
        )
        .with_metrics(metrics.clone()),
    );
    let market_data: Arc<dyn MarketDataProvider> =
        Arc::new(MexcRestClient::new(settings.rest_base.clone())?);

    let notifier: Arc<dyn Notifier> = match TelegramNotifier::from_settings(&settings) {
        Some(telegram) => {
            info!("Delivering alerts to Telegram");
            Arc::new(telegram?)
        }
        None => {
            info!("Telegram not configured; alerts go to the log only");
            Arc::new(LogNotifier)
        }
    };

    let runtime = AlertRuntime::new(hub, market_data, notifier, metrics)
        .with_warmup_bars(settings.warmup_bars);
    let handles = runtime.start(&settings).await;
    info!(workers = handles.len(), "Alerts worker started, waiting for shutdown signal...");

    signal::ctrl_c().await?;
    info!("Shutting down alerts worker...");
    runtime.shutdown().await;
    for handle in handles {
        handle.abort();
    }
    info!("Alerts worker stopped");

    Ok(())
}
