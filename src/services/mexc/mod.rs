//! MEXC futures integration: wire messages, REST client and kline streams.

pub mod messages;
pub mod rest;
pub mod stream;

pub use messages::{interval_seconds, KlineUpdate, RequestMessage, StreamEvent};
pub use rest::MexcRestClient;
pub use stream::{KlineStreamer, StreamHub};
