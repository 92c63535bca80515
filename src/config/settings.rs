//! Service settings loaded from the environment (and `.env` via dotenvy).

use std::env;
use std::str::FromStr;

use url::Url;

use crate::config::engine::{EngineConfig, DEFAULT_BALANCE_THRESHOLD};
use crate::error::ConfigError;

pub const DEFAULT_WS_URL: &str = "wss://contract.mexc.com/edge";
pub const DEFAULT_REST_BASE: &str = "https://contract.mexc.com/api/v1";
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub ws_url: String,
    pub rest_base: String,
    pub default_symbol: String,
    pub default_interval: String,
    pub ping_interval_secs: u64,
    pub symbols: Vec<String>,
    pub intervals: Vec<String>,
    pub balance_threshold: f64,
    pub enable_balance: bool,
    pub enable_efm: bool,
    pub enable_rebounds: bool,
    pub enable_rebounds_late: bool,
    pub warmup_bars: usize,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_base: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_WS_URL.to_string(),
            rest_base: DEFAULT_REST_BASE.to_string(),
            default_symbol: "DOGE_USDT".to_string(),
            default_interval: "Min1".to_string(),
            ping_interval_secs: 15,
            symbols: vec!["DOGE_USDT".to_string()],
            intervals: vec!["Min1".to_string()],
            balance_threshold: DEFAULT_BALANCE_THRESHOLD,
            enable_balance: true,
            enable_efm: true,
            enable_rebounds: true,
            enable_rebounds_late: true,
            warmup_bars: 500,
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_api_base: DEFAULT_TELEGRAM_API.to_string(),
            port: 8080,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; missing keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let ws_url = get("MEXC_WS_URL").unwrap_or(defaults.ws_url);
        Url::parse(&ws_url).map_err(|source| ConfigError::InvalidUrl {
            key: "MEXC_WS_URL",
            source,
        })?;
        let rest_base = get("MEXC_REST_BASE").unwrap_or(defaults.rest_base);
        Url::parse(&rest_base).map_err(|source| ConfigError::InvalidUrl {
            key: "MEXC_REST_BASE",
            source,
        })?;
        let rest_base = rest_base.trim_end_matches('/').to_string();

        let default_symbol = get("DEFAULT_SYMBOL").unwrap_or(defaults.default_symbol);
        let default_interval = get("DEFAULT_INTERVAL").unwrap_or(defaults.default_interval);
        let symbols = get("SYMBOLS")
            .map(|s| split_list(&s))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| vec![default_symbol.clone()]);
        let intervals = get("INTERVALS")
            .map(|s| split_list(&s))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| vec![default_interval.clone()]);

        let ping_interval_secs = parse_or(
            "PING_INTERVAL_SEC",
            get("PING_INTERVAL_SEC"),
            defaults.ping_interval_secs,
        )?;
        if ping_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "PING_INTERVAL_SEC",
                value: "0".to_string(),
            });
        }
        let balance_threshold = parse_or(
            "BALANCE_THRESHOLD",
            get("BALANCE_THRESHOLD"),
            defaults.balance_threshold,
        )?;
        let warmup_bars = parse_or("WARMUP_BARS", get("WARMUP_BARS"), defaults.warmup_bars)?;
        let port = parse_or("PORT", get("PORT"), defaults.port)?;

        Ok(Self {
            ws_url,
            rest_base,
            default_symbol,
            default_interval,
            ping_interval_secs,
            symbols,
            intervals,
            balance_threshold,
            enable_balance: flag_or("ENABLE_BALANCE", get("ENABLE_BALANCE"), true)?,
            enable_efm: flag_or("ENABLE_EFM", get("ENABLE_EFM"), true)?,
            enable_rebounds: flag_or("ENABLE_REBOUNDS", get("ENABLE_REBOUNDS"), true)?,
            enable_rebounds_late: flag_or(
                "ENABLE_REBOUNDS_LATE",
                get("ENABLE_REBOUNDS_LATE"),
                true,
            )?,
            warmup_bars,
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
            telegram_api_base: get("TELEGRAM_API_BASE").unwrap_or(defaults.telegram_api_base),
            port,
        })
    }

    /// One engine config per configured (symbol, interval) pair.
    pub fn engine_configs(&self) -> Vec<EngineConfig> {
        self.symbols
            .iter()
            .flat_map(|symbol| {
                self.intervals.iter().map(move |interval| {
                    EngineConfig::new(symbol.clone(), interval.clone())
                        .with_balance_threshold(self.balance_threshold)
                        .with_balance(self.enable_balance)
                        .with_efm(self.enable_efm)
                        .with_rebounds(self.enable_rebounds)
                        .with_rebounds_late(self.enable_rebounds_late)
                })
            })
            .collect()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn flag_or(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}
