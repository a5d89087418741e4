use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::exchanges::bitfinex::{conversions, rest::BitfinexRest};
use async_trait::async_trait;
use tracing::{instrument, warn};

/// Bitfinex wallet and margin position lookups
pub struct Account<R: RestClient> {
    rest: BitfinexRest<R>,
}

impl<R: RestClient + Clone> Account<R> {
    pub fn new(rest: &R, symbol: String) -> Self {
        Self {
            rest: BitfinexRest::new(rest.clone(), symbol),
        }
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for Account<R> {
    #[instrument(skip(self), fields(exchange = "bitfinex"))]
    async fn get_avail(&self, currency: &str) -> Result<f64, ExchangeError> {
        let balances = self.rest.get_balances().await?;
        Ok(conversions::find_trading_balance(&balances, currency).unwrap_or(0.0))
    }

    #[instrument(skip(self), fields(exchange = "bitfinex"))]
    async fn get_active_pos(&self) -> Result<f64, ExchangeError> {
        let positions = self.rest.get_positions().await?;

        match conversions::first_position_amount(&positions) {
            Some(amount) => Ok(amount.unwrap_or(0.0)),
            None => {
                warn!(
                    symbol = %self.rest.symbol(),
                    "Position not available, return 0.0"
                );
                Ok(0.0)
            }
        }
    }
}
