//! HTTP endpoint server using Axum

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        Query, Request, State,
    },
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, info, warn, Level};

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::services::mexc::{MexcRestClient, StreamHub};
use crate::services::MarketDataProvider;

pub const DEFAULT_KLINE_LIMIT: usize = 500;
pub const MAX_KLINE_LIMIT: usize = 2000;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub market_data: Arc<dyn MarketDataProvider>,
    pub hub: Arc<StreamHub>,
    pub default_symbol: String,
    pub default_interval: String,
}

impl AppState {
    pub fn new(
        metrics: Arc<Metrics>,
        market_data: Arc<dyn MarketDataProvider>,
        hub: Arc<StreamHub>,
        default_symbol: impl Into<String>,
        default_interval: impl Into<String>,
    ) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            market_data,
            hub,
            default_symbol: default_symbol.into(),
            default_interval: default_interval.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "zonewatch-alerts"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct KlinesQuery {
    symbol: Option<String>,
    interval: Option<String>,
    limit: Option<String>,
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn parse_limit(raw: Option<&str>) -> Result<usize, (StatusCode, Json<Value>)> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_KLINE_LIMIT);
    };
    match raw.parse::<usize>() {
        Ok(limit) if (1..=MAX_KLINE_LIMIT).contains(&limit) => Ok(limit),
        _ => Err(bad_request("limit must be an integer between 1 and 2000")),
    }
}

/// Historical candles for chart clients
async fn get_klines(
    State(state): State<AppState>,
    Query(params): Query<KlinesQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let limit = parse_limit(params.limit.as_deref())?;
    let symbol = params
        .symbol
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| state.default_symbol.clone());
    let interval = params
        .interval
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| state.default_interval.clone());

    let candles = state
        .market_data
        .get_candles(&symbol, &interval, limit)
        .await
        .map_err(|e| {
            error!(error = %e, symbol = %symbol, interval = %interval, "Failed to fetch klines");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "upstream kline request failed" })),
            )
        })?;

    Ok(Json(json!({
        "symbol": symbol,
        "interval": interval,
        "candles": candles,
    })))
}

/// Tradable USDT-settled contracts
async fn list_contracts(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let contracts = state.market_data.get_contracts().await.map_err(|e| {
        error!(error = %e, "Failed to fetch contracts");
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "upstream contract request failed" })),
        )
    })?;
    Ok(Json(json!({ "contracts": contracts })))
}

#[derive(Debug, Deserialize)]
struct StreamQuery {
    symbol: Option<String>,
    interval: Option<String>,
}

/// Live kline relay for chart clients
async fn ws_kline(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<StreamQuery>,
) -> Response {
    let symbol = params
        .symbol
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| state.default_symbol.clone());
    let interval = params
        .interval
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| state.default_interval.clone());
    ws.on_upgrade(move |socket| relay_klines(socket, state.hub, symbol, interval))
}

/// Forward every update of the shared market stream as
/// `{"type":"kline","payload":...}` until the client goes away.
async fn relay_klines(socket: WebSocket, hub: Arc<StreamHub>, symbol: String, interval: String) {
    let stream = hub.get_or_create(&symbol, &interval).await;
    let mut updates = stream.subscribe();
    stream.start().await;
    info!(symbol = %symbol, interval = %interval, "kline client connected");

    let (mut sender, mut receiver) = socket.split();
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(update) => {
                    let frame = json!({ "type": "kline", "payload": update }).to_string();
                    if sender.send(WsMessage::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(symbol = %symbol, skipped, "kline client lagging");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    debug!(symbol = %symbol, interval = %interval, "kline client disconnected");
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/contracts", get(list_contracts))
        .route("/api/klines", get(get_klines))
        .route("/ws/kline", get(ws_kline))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let market_data: Arc<dyn MarketDataProvider> =
        Arc::new(MexcRestClient::new(settings.rest_base.clone())?);

    let hub = Arc::new(
        StreamHub::new(
            settings.ws_url.clone(),
            Duration::from_secs(settings.ping_interval_secs),
        )
        .with_metrics(metrics.clone()),
    );

    let state = AppState::new(
        metrics,
        market_data,
        hub.clone(),
        settings.default_symbol.clone(),
        settings.default_interval.clone(),
    );
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.port)).await?;

    info!(port = settings.port, "HTTP server listening on port {}", settings.port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        settings.port
    );
    let served = axum::serve(listener, app).await;
    hub.stop_all().await;
    served?;

    Ok(())
}
