use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer};
use crate::core::types::{BookSide, OrderBook, OrderSide, Quote};
use async_trait::async_trait;

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use market_data::{depth_weighted_price, MarketData};
pub use trading::Trading;

/// Bitfinex connector that composes all sub-trait implementations
pub struct BitfinexConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: Account<R>,
}

impl<R: RestClient + Clone> BitfinexConnector<R> {
    /// Create a connector over an already configured transport
    pub fn new(rest: R, config: &ExchangeConfig) -> Self {
        Self {
            market: MarketData::new(&rest, config.symbol.clone(), config.order_book_factor),
            trading: Trading::new(&rest, config.symbol.clone()),
            account: Account::new(&rest, config.symbol.clone()),
        }
    }
}

impl<R: RestClient> BitfinexConnector<R> {
    pub async fn send_long_order(&self, quantity: f64, price: f64) -> Result<String, ExchangeError> {
        self.trading.send_long_order(quantity, price).await
    }

    pub async fn send_short_order(
        &self,
        quantity: f64,
        price: f64,
    ) -> Result<String, ExchangeError> {
        self.trading.send_short_order(quantity, price).await
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for BitfinexConnector<R> {
    async fn get_quote(&self) -> Result<Quote, ExchangeError> {
        self.market.get_quote().await
    }

    async fn get_order_book(&self) -> Result<OrderBook, ExchangeError> {
        self.market.get_order_book().await
    }

    async fn get_limit_price(&self, volume: f64, side: BookSide) -> Result<f64, ExchangeError> {
        self.market.get_limit_price(volume, side).await
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for BitfinexConnector<R> {
    async fn send_order(
        &self,
        side: OrderSide,
        quantity: f64,
        price: f64,
    ) -> Result<String, ExchangeError> {
        self.trading.send_order(side, quantity, price).await
    }

    async fn is_order_complete(&self, order_id: &str) -> Result<bool, ExchangeError> {
        self.trading.is_order_complete(order_id).await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for BitfinexConnector<R> {
    async fn get_avail(&self, currency: &str) -> Result<f64, ExchangeError> {
        self.account.get_avail(currency).await
    }

    async fn get_active_pos(&self) -> Result<f64, ExchangeError> {
        self.account.get_active_pos().await
    }
}

impl<R: RestClient> ExchangeConnector for BitfinexConnector<R> {}
