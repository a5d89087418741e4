use serde::{Deserialize, Serialize};

/// One wallet entry of `/v1/balances`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitfinexBalance {
    #[serde(rename = "type")]
    pub wallet_type: String,
    pub currency: String,
    pub amount: String,
    #[serde(default)]
    pub available: Option<String>,
}

/// Fields of a `/v1/order/new` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BitfinexNewOrder {
    pub symbol: String,
    pub amount: String,
    pub price: String,
    pub exchange: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
}

/// Fields of a `/v1/order/status` request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BitfinexOrderStatusRequest {
    pub order_id: u64,
}
