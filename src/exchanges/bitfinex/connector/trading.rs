use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::{OrderSide, NO_ORDER_ID};
use crate::exchanges::bitfinex::{conversions, rest::BitfinexRest, types::BitfinexNewOrder};
use async_trait::async_trait;
use tracing::{info, instrument};

const EXCHANGE_TAG: &str = "bitfinex";

/// Bitfinex order placement and status polling
pub struct Trading<R: RestClient> {
    rest: BitfinexRest<R>,
}

impl<R: RestClient + Clone> Trading<R> {
    pub fn new(rest: &R, symbol: String) -> Self {
        Self {
            rest: BitfinexRest::new(rest.clone(), symbol),
        }
    }
}

fn validate_order(quantity: f64, price: f64) -> Result<(), ExchangeError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(ExchangeError::InvalidParameters(format!(
            "Order quantity must be positive, got {}",
            quantity
        )));
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(ExchangeError::InvalidParameters(format!(
            "Order price must be positive, got {}",
            price
        )));
    }
    Ok(())
}

fn parse_order_id(order_id: &str) -> Result<u64, ExchangeError> {
    order_id.trim().parse::<u64>().map_err(|e| {
        ExchangeError::InvalidParameters(format!("Invalid order id '{}': {}", order_id, e))
    })
}

impl<R: RestClient> Trading<R> {
    /// Buy `quantity` at `price`
    pub async fn send_long_order(&self, quantity: f64, price: f64) -> Result<String, ExchangeError> {
        self.send_order(OrderSide::Buy, quantity, price).await
    }

    /// Sell `quantity` at `price`
    pub async fn send_short_order(
        &self,
        quantity: f64,
        price: f64,
    ) -> Result<String, ExchangeError> {
        self.send_order(OrderSide::Sell, quantity, price).await
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for Trading<R> {
    #[instrument(skip(self), fields(exchange = "bitfinex"))]
    async fn send_order(
        &self,
        side: OrderSide,
        quantity: f64,
        price: f64,
    ) -> Result<String, ExchangeError> {
        validate_order(quantity, price)?;

        info!(
            "Trying to send a \"{}\" limit order: {}@${}...",
            side, quantity, price
        );

        let order = BitfinexNewOrder {
            symbol: self.rest.symbol().to_string(),
            amount: quantity.to_string(),
            price: price.to_string(),
            exchange: EXCHANGE_TAG.to_string(),
            side: side.as_str().to_string(),
            order_type: "limit".to_string(),
        };

        let response = self.rest.new_order(&order).await?;
        let order_id = conversions::integer_field(&response, "order_id")
            .unwrap_or(0)
            .to_string();

        info!("Done (order ID: {})", order_id);
        Ok(order_id)
    }

    #[instrument(skip(self), fields(exchange = "bitfinex"))]
    async fn is_order_complete(&self, order_id: &str) -> Result<bool, ExchangeError> {
        if order_id == NO_ORDER_ID {
            return Ok(true);
        }

        let id = parse_order_id(order_id)?;
        let status = self.rest.order_status(id).await?;

        Ok(conversions::bool_field(&status, "is_live") == Some(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_order() {
        assert!(validate_order(0.5, 27_000.0).is_ok());
        assert!(validate_order(0.0, 27_000.0).is_err());
        assert!(validate_order(-1.0, 27_000.0).is_err());
        assert!(validate_order(1.0, 0.0).is_err());
        assert!(validate_order(f64::NAN, 1.0).is_err());
        assert!(validate_order(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_order_id() {
        assert_eq!(parse_order_id("448364249").unwrap(), 448_364_249);
        assert!(matches!(
            parse_order_id("abc"),
            Err(ExchangeError::InvalidParameters(_))
        ));
        assert!(parse_order_id("-5").is_err());
    }
}
