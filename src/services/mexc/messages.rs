//! MEXC contract websocket and REST payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FeedError;
use crate::models::Candle;

pub const CHANNEL_KLINE: &str = "push.kline";
pub const CHANNEL_PONG: &str = "pong";

/// Bar length in seconds for an exchange interval name; unknown names map to
/// one minute.
pub fn interval_seconds(interval: &str) -> i64 {
    match interval {
        "Min1" => 60,
        "Min5" => 300,
        "Min15" => 900,
        "Min30" => 1_800,
        "Min60" => 3_600,
        "Hour4" => 14_400,
        "Hour8" => 28_800,
        "Day1" => 86_400,
        "Week1" => 604_800,
        "Month1" => 2_592_000,
        _ => 60,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KlineParam {
    pub symbol: String,
    pub interval: String,
}

/// Outgoing websocket requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method")]
pub enum RequestMessage {
    #[serde(rename = "sub.kline")]
    SubscribeKline { param: KlineParam },
    #[serde(rename = "unsub.kline")]
    UnsubscribeKline { param: KlineParam },
    #[serde(rename = "ping")]
    Ping,
}

impl RequestMessage {
    pub fn subscribe_kline(symbol: &str, interval: &str) -> Self {
        RequestMessage::SubscribeKline {
            param: KlineParam {
                symbol: symbol.to_string(),
                interval: interval.to_string(),
            },
        }
    }

    pub fn unsubscribe_kline(symbol: &str, interval: &str) -> Self {
        RequestMessage::UnsubscribeKline {
            param: KlineParam {
                symbol: symbol.to_string(),
                interval: interval.to_string(),
            },
        }
    }
}

/// Numeric field that the exchange may send as a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Number(n) => Some(*n),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One kline as pushed by the stream or returned by REST, keyed by open time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlineUpdate {
    pub symbol: String,
    pub interval: String,
    #[serde(flatten)]
    pub candle: Candle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Kline(KlineUpdate),
    Pong,
    /// Any other channel; carries the channel name.
    Other(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    channel: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct RawKline {
    t: Numeric,
    o: Numeric,
    h: Numeric,
    l: Numeric,
    c: Numeric,
    #[serde(default)]
    q: Option<Numeric>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    interval: Option<String>,
}

fn field(value: &Numeric, name: &str) -> Result<f64, FeedError> {
    value
        .as_f64()
        .ok_or_else(|| FeedError::Malformed(format!("field {} is not numeric", name)))
}

/// Parse one websocket text frame.
///
/// `symbol`/`interval` fill in kline fields the exchange omits.
pub fn parse_stream_message(
    text: &str,
    symbol: &str,
    interval: &str,
) -> Result<StreamEvent, FeedError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    match envelope.channel.as_str() {
        CHANNEL_PONG => Ok(StreamEvent::Pong),
        CHANNEL_KLINE => {
            let raw: RawKline = serde_json::from_value(envelope.data)
                .map_err(|e| FeedError::Malformed(e.to_string()))?;
            let candle = Candle {
                time: field(&raw.t, "t")? as i64,
                open: field(&raw.o, "o")?,
                high: field(&raw.h, "h")?,
                low: field(&raw.l, "l")?,
                close: field(&raw.c, "c")?,
                volume: raw.q.as_ref().and_then(Numeric::as_f64).unwrap_or(0.0),
            };
            Ok(StreamEvent::Kline(KlineUpdate {
                symbol: raw.symbol.unwrap_or_else(|| symbol.to_string()),
                interval: raw.interval.unwrap_or_else(|| interval.to_string()),
                candle,
            }))
        }
        other => Ok(StreamEvent::Other(other.to_string())),
    }
}

/// REST `contract/kline` payload: parallel arrays.
#[derive(Debug, Default, Deserialize)]
pub struct KlineArrays {
    #[serde(default)]
    pub time: Vec<Numeric>,
    #[serde(default)]
    pub open: Vec<Numeric>,
    #[serde(default)]
    pub high: Vec<Numeric>,
    #[serde(default)]
    pub low: Vec<Numeric>,
    #[serde(default)]
    pub close: Vec<Numeric>,
    #[serde(default)]
    pub vol: Vec<Numeric>,
}

impl KlineArrays {
    /// Zip the arrays into candles, truncated to the shortest price array.
    /// Entries with unparsable values are skipped; missing volume is zero.
    pub fn into_candles(self) -> Vec<Candle> {
        let n = self
            .time
            .len()
            .min(self.open.len())
            .min(self.high.len())
            .min(self.low.len())
            .min(self.close.len());

        (0..n)
            .filter_map(|i| {
                Some(Candle {
                    time: self.time[i].as_f64()? as i64,
                    open: self.open[i].as_f64()?,
                    high: self.high[i].as_f64()?,
                    low: self.low[i].as_f64()?,
                    close: self.close[i].as_f64()?,
                    volume: self.vol.get(i).and_then(Numeric::as_f64).unwrap_or(0.0),
                })
            })
            .collect()
    }
}

/// REST `contract/detail` entry; only the fields we normalize.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDetail {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub display_name_en: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub base_coin: Option<String>,
    #[serde(default)]
    pub quote_coin: Option<String>,
    #[serde(default)]
    pub settle_coin: Option<String>,
    #[serde(default)]
    pub api_allowed: Option<bool>,
    #[serde(default)]
    pub price_scale: Option<u32>,
    #[serde(default)]
    pub amount_scale: Option<u32>,
}

/// Envelope shared by MEXC REST responses.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}
