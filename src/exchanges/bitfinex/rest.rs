use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::bitfinex::types::{BitfinexNewOrder, BitfinexOrderStatusRequest};
use serde_json::Value;
use tracing::{instrument, warn};

pub const BALANCES_ENDPOINT: &str = "/v1/balances";
pub const NEW_ORDER_ENDPOINT: &str = "/v1/order/new";
pub const ORDER_STATUS_ENDPOINT: &str = "/v1/order/status";
pub const POSITIONS_ENDPOINT: &str = "/v1/positions";

/// Error text embedded in a response, if any
///
/// Bitfinex reports failures as `{"message": "..."}` (and occasionally
/// `{"error": "..."}`) with whatever other fields it could still fill in.
pub fn protocol_error(root: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| match root.get(key)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        })
}

/// Log an embedded error and hand the document back untouched
pub fn check_response(root: Value) -> Value {
    if let Some(message) = protocol_error(&root) {
        warn!(exchange = "bitfinex", %message, "Error with response");
    }
    root
}

/// Thin wrapper around `RestClient` for the Bitfinex v1 API
///
/// Every method returns the raw document after it went through
/// [`check_response`]; field extraction is left to the connector.
#[derive(Debug, Clone)]
pub struct BitfinexRest<R: RestClient> {
    client: R,
    symbol: String,
}

impl<R: RestClient> BitfinexRest<R> {
    pub fn new(client: R, symbol: String) -> Self {
        Self { client, symbol }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Signed POST; `fields` is merged into the signed payload
    #[instrument(skip(self, fields), fields(exchange = "bitfinex"))]
    pub async fn auth_request(&self, endpoint: &str, fields: &Value) -> Result<Value, ExchangeError> {
        let response = self.client.post(endpoint, fields, true).await?;
        Ok(check_response(response))
    }

    #[instrument(skip(self), fields(exchange = "bitfinex", symbol = %self.symbol))]
    pub async fn get_ticker(&self) -> Result<Value, ExchangeError> {
        let endpoint = format!("/v1/ticker/{}", self.symbol);
        let response = self.client.get(&endpoint, &[], false).await?;
        Ok(check_response(response))
    }

    #[instrument(skip(self), fields(exchange = "bitfinex", symbol = %self.symbol))]
    pub async fn get_book(&self) -> Result<Value, ExchangeError> {
        let endpoint = format!("/v1/book/{}", self.symbol);
        let response = self.client.get(&endpoint, &[], false).await?;
        Ok(check_response(response))
    }

    pub async fn get_balances(&self) -> Result<Value, ExchangeError> {
        self.auth_request(BALANCES_ENDPOINT, &Value::Null).await
    }

    pub async fn new_order(&self, order: &BitfinexNewOrder) -> Result<Value, ExchangeError> {
        let fields = serde_json::to_value(order)
            .map_err(|e| ExchangeError::SerializationError(e.to_string()))?;
        self.auth_request(NEW_ORDER_ENDPOINT, &fields).await
    }

    pub async fn order_status(&self, order_id: u64) -> Result<Value, ExchangeError> {
        let fields = serde_json::to_value(BitfinexOrderStatusRequest { order_id })
            .map_err(|e| ExchangeError::SerializationError(e.to_string()))?;
        self.auth_request(ORDER_STATUS_ENDPOINT, &fields).await
    }

    pub async fn get_positions(&self) -> Result<Value, ExchangeError> {
        self.auth_request(POSITIONS_ENDPOINT, &Value::Null).await
    }
}
