use bfxadapter::core::config::ExchangeConfig;
use bfxadapter::core::traits::{AccountInfo, MarketDataSource};
use bfxadapter::exchanges::bitfinex::build_connector;
use bfxadapter::BookSide;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let volume = match std::env::args().nth(1) {
        Some(raw) => raw.parse::<f64>()?,
        None => 0.01,
    };

    // Credentials are optional: without them only public endpoints are queried
    let config = match ExchangeConfig::from_env("BITFINEX") {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; continuing with public endpoints only", e);
            ExchangeConfig::read_only_from_env("BITFINEX")?
        }
    };
    let authenticated = config.has_credentials();
    let symbol = config.symbol.clone();

    let bitfinex = build_connector(config)?;

    let quote = bitfinex.get_quote().await?;
    println!("{} quote: bid {} / ask {}", symbol, quote.bid, quote.ask);

    let bid_price = bitfinex.get_limit_price(volume, BookSide::Bid).await?;
    let ask_price = bitfinex.get_limit_price(volume, BookSide::Ask).await?;
    println!(
        "Limit prices for {}: sell at {}, buy at {}",
        volume, bid_price, ask_price
    );

    if authenticated {
        let base = symbol.get(..3).unwrap_or(&symbol);
        let quote_ccy = symbol.get(3..).unwrap_or("usd");
        println!(
            "Trading balance: {} {}, {} {}",
            bitfinex.get_avail(base).await?,
            base,
            bitfinex.get_avail(quote_ccy).await?,
            quote_ccy
        );
        println!("Active position: {}", bitfinex.get_active_pos().await?);
    }

    Ok(())
}
