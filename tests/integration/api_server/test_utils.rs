//! Test utilities for API server integration tests

use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;
use zonewatch::core::http::{create_router, AppState};
use zonewatch::metrics::Metrics;
use zonewatch::services::mexc::{MexcRestClient, StreamHub};
use zonewatch::services::MarketDataProvider;

use crate::test_utils::{candle, mock_contracts, mock_klines};

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub mexc: MockServer,
}

impl TestApiServer {
    pub async fn new() -> Self {
        let mexc = MockServer::start().await;
        let candles: Vec<_> = (0..5)
            .map(|i| {
                let p = 0.1 + i as f64 * 0.01;
                candle(60 * i, p, p + 0.005, p - 0.005, p + 0.002)
            })
            .collect();
        mock_klines(&mexc, "DOGE_USDT", &candles).await;
        mock_contracts(&mexc).await;

        let market_data: Arc<dyn MarketDataProvider> =
            Arc::new(MexcRestClient::new(mexc.uri()).expect("rest client"));
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let hub = Arc::new(StreamHub::new("ws://127.0.0.1:9", Duration::from_secs(15)));
        let state = AppState::new(metrics.clone(), market_data, hub, "DOGE_USDT", "Min1");

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            mexc,
        }
    }
}
