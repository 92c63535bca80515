use serde::{Deserialize, Serialize};

/// Normalized futures contract metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub symbol: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_coin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_coin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_scale: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_scale: Option<u32>,
}
