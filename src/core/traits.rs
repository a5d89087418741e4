use crate::core::{
    errors::ExchangeError,
    types::{BookSide, OrderBook, OrderSide, Quote},
};
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataSource {
    /// Current best bid and ask; missing sides are reported as 0.0
    async fn get_quote(&self) -> Result<Quote, ExchangeError>;

    /// Snapshot of both book sides, best level first
    async fn get_order_book(&self) -> Result<OrderBook, ExchangeError>;

    /// Price of the level at which cumulative depth on `side` covers
    /// `|volume|` times the configured depth factor
    async fn get_limit_price(&self, volume: f64, side: BookSide) -> Result<f64, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Place a limit order and return the exchange order id ("0" when none was assigned)
    async fn send_order(
        &self,
        side: OrderSide,
        quantity: f64,
        price: f64,
    ) -> Result<String, ExchangeError>;

    /// Whether the order is no longer live on the exchange
    async fn is_order_complete(&self, order_id: &str) -> Result<bool, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    /// Available "trading" wallet balance for `currency`
    async fn get_avail(&self, currency: &str) -> Result<f64, ExchangeError>;

    /// Signed size of the first open position
    async fn get_active_pos(&self) -> Result<f64, ExchangeError>;
}

// Composite trait for callers that need every capability
#[async_trait]
pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo {}
