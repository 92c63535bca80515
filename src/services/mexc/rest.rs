//! MEXC futures REST client for historical klines and contract metadata.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::messages::{interval_seconds, ApiResponse, ContractDetail, KlineArrays};
use crate::error::MarketDataError;
use crate::models::{Candle, Contract};
use crate::services::market_data::MarketDataProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SETTLE_COIN: &str = "USDT";

#[derive(Debug, Clone)]
pub struct MexcRestClient {
    client: Client,
    base_url: String,
}

impl MexcRestClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, MarketDataError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn unwrap_response<T>(response: ApiResponse<T>) -> Result<T, MarketDataError> {
        if response.success == Some(false) {
            return Err(MarketDataError::Api(format!(
                "code {}: {}",
                response.code.unwrap_or_default(),
                response.message.unwrap_or_default()
            )));
        }
        response
            .data
            .ok_or_else(|| MarketDataError::Api("response has no data".to_string()))
    }
}

/// Keep USDT-settled contracts open to API trading, normalized and sorted.
pub fn normalize_contracts(details: Vec<ContractDetail>) -> Vec<Contract> {
    let mut contracts: Vec<Contract> = details
        .into_iter()
        .filter(|d| d.settle_coin.as_deref() == Some(SETTLE_COIN))
        .filter(|d| d.api_allowed != Some(false))
        .filter_map(|d| {
            let symbol = d.symbol?;
            let display_name = d
                .display_name_en
                .or(d.display_name)
                .unwrap_or_else(|| symbol.clone());
            Some(Contract {
                symbol,
                display_name,
                base_coin: d.base_coin,
                quote_coin: d.quote_coin,
                price_scale: d.price_scale,
                amount_scale: d.amount_scale,
            })
        })
        .collect();
    contracts.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    contracts
}

#[async_trait]
impl MarketDataProvider for MexcRestClient {
    async fn get_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let end = Utc::now().timestamp();
        let start = end - limit as i64 * interval_seconds(interval);
        let url = format!("{}/contract/kline/{}", self.base_url, symbol);

        let response: ApiResponse<KlineArrays> = self
            .client
            .get(&url)
            .query(&[
                ("interval", interval.to_string()),
                ("start", start.to_string()),
                ("end", end.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut candles = Self::unwrap_response(response)?.into_candles();
        if candles.len() > limit {
            candles.drain(..candles.len() - limit);
        }
        debug!(
            symbol = %symbol,
            interval = %interval,
            count = candles.len(),
            "fetched klines"
        );
        Ok(candles)
    }

    async fn get_contracts(&self) -> Result<Vec<Contract>, MarketDataError> {
        let url = format!("{}/contract/detail", self.base_url);
        let response: ApiResponse<Vec<ContractDetail>> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let contracts = normalize_contracts(Self::unwrap_response(response)?);
        debug!(count = contracts.len(), "fetched contracts");
        Ok(contracts)
    }
}
