use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::MarketDataSource;
use crate::core::types::{BookSide, OrderBook, OrderBookLevel, Quote};
use crate::exchanges::bitfinex::{conversions, rest::BitfinexRest};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Walk `levels` best-first until their cumulative volume reaches
/// `|volume| * depth_factor` and return the price of that level
///
/// When the side runs out first, the last level's price is returned; an
/// empty side yields 0.0.
pub fn depth_weighted_price(levels: &[OrderBookLevel], volume: f64, depth_factor: f64) -> f64 {
    let target = volume.abs() * depth_factor;
    let mut accumulated = 0.0;
    let mut price = 0.0;

    for level in levels {
        price = level.price;
        debug!(exchange = "bitfinex", "order book: {}@${}", level.volume, level.price);
        accumulated += level.volume;
        if accumulated >= target {
            break;
        }
    }

    price
}

/// Bitfinex public market data
pub struct MarketData<R: RestClient> {
    rest: BitfinexRest<R>,
    order_book_factor: f64,
}

impl<R: RestClient + Clone> MarketData<R> {
    pub fn new(rest: &R, symbol: String, order_book_factor: f64) -> Self {
        Self {
            rest: BitfinexRest::new(rest.clone(), symbol),
            order_book_factor,
        }
    }
}

impl<R: RestClient> MarketData<R> {
    pub fn order_book_factor(&self) -> f64 {
        self.order_book_factor
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for MarketData<R> {
    #[instrument(skip(self), fields(exchange = "bitfinex"))]
    async fn get_quote(&self) -> Result<Quote, ExchangeError> {
        let ticker = self.rest.get_ticker().await?;
        Ok(conversions::convert_quote(&ticker))
    }

    #[instrument(skip(self), fields(exchange = "bitfinex"))]
    async fn get_order_book(&self) -> Result<OrderBook, ExchangeError> {
        let book = self.rest.get_book().await?;
        Ok(conversions::convert_order_book(&book))
    }

    #[instrument(skip(self), fields(exchange = "bitfinex"))]
    async fn get_limit_price(&self, volume: f64, side: BookSide) -> Result<f64, ExchangeError> {
        let book = self.rest.get_book().await?;
        let levels = conversions::convert_book_side(&book, side);

        info!(
            "Looking for a limit price to fill {} {}...",
            volume.abs(),
            self.rest.symbol()
        );

        Ok(depth_weighted_price(&levels, volume, self.order_book_factor))
    }
}
