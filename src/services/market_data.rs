//! Market data provider interface for historical candles and contract metadata.

use async_trait::async_trait;

use crate::error::MarketDataError;
use crate::models::{Candle, Contract};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Most recent candles for a market, oldest first, at most `limit`.
    async fn get_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// Tradable contracts, sorted by symbol.
    async fn get_contracts(&self) -> Result<Vec<Contract>, MarketDataError>;
}
