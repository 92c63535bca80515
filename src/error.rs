//! Error types for the collaborators around the engine.
//!
//! The engine itself is infallible; these cover configuration, the exchange
//! feed, REST market data and outbound notifications.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("invalid url for {key}: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("out-of-order bar: last open time {last}, received {received}")]
    OutOfOrder { last: i64, received: i64 },
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("connection closed")]
    ConnectionClosed,
    #[error("no data received for {0} seconds")]
    Stale(u64),
}

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("exchange rejected request: {0}")]
    Api(String),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
