//! Live tests against the public Bitfinex API.
//!
//! Skipped unless `RUN_INTEGRATION_TESTS=true`; network failures are
//! reported, not asserted, so an offline run stays green.

use bfxadapter::core::config::ExchangeConfig;
use bfxadapter::core::traits::{MarketDataSource, OrderPlacer};
use bfxadapter::exchanges::bitfinex::build_connector;
use bfxadapter::BookSide;
use std::env;
use std::time::Duration;
use tokio::time::timeout;

fn should_run_integration_tests() -> bool {
    env::var("RUN_INTEGRATION_TESTS").unwrap_or_default() == "true"
}

fn test_timeout() -> Duration {
    Duration::from_secs(
        env::var("TEST_TIMEOUT_SECONDS")
            .unwrap_or_default()
            .parse()
            .unwrap_or(30),
    )
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_bitfinex_quote() {
        if !should_run_integration_tests() {
            return;
        }

        let connector = build_connector(ExchangeConfig::read_only()).unwrap();
        match timeout(test_timeout(), connector.get_quote()).await {
            Ok(Ok(quote)) => {
                println!("✅ Bitfinex quote: {} / {}", quote.bid, quote.ask);
                assert!(quote.bid <= quote.ask || quote.ask == 0.0);
            }
            Ok(Err(e)) => println!("⚠️ Bitfinex quote failed: {}", e),
            Err(_) => println!("⚠️ Bitfinex quote timed out"),
        }
    }

    #[tokio::test]
    async fn test_bitfinex_limit_price() {
        if !should_run_integration_tests() {
            return;
        }

        let connector = build_connector(ExchangeConfig::read_only()).unwrap();
        match timeout(test_timeout(), connector.get_limit_price(0.01, BookSide::Bid)).await {
            Ok(Ok(price)) => {
                println!("✅ Bitfinex bid-side limit price: {}", price);
                assert!(price >= 0.0);
            }
            Ok(Err(e)) => println!("⚠️ Bitfinex order book failed: {}", e),
            Err(_) => println!("⚠️ Bitfinex order book timed out"),
        }
    }

    #[tokio::test]
    async fn test_bitfinex_sentinel_order_offline() {
        let connector = build_connector(ExchangeConfig::read_only()).unwrap();
        assert!(connector.is_order_complete("0").await.unwrap());
    }
}
