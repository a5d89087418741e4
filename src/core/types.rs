use serde::{Deserialize, Serialize};
use std::fmt;

/// Order identifier the exchange never assigns; stands for "no order was placed"
pub const NO_ORDER_ID: &str = "0";

/// Best bid and ask in quote currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: f64,
    pub ask: f64,
}

impl Quote {
    pub fn new(bid: f64, ask: f64) -> Self {
        Self { bid, ask }
    }

    /// Midpoint, or `None` while either side is missing
    pub fn mid(&self) -> Option<f64> {
        if self.bid > 0.0 && self.ask > 0.0 {
            Some((self.bid + self.ask) / 2.0)
        } else {
            None
        }
    }
}

impl From<Quote> for (f64, f64) {
    fn from(quote: Quote) -> Self {
        (quote.bid, quote.ask)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of the order book to scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    Bid,
    Ask,
}

impl BookSide {
    /// JSON key of this side in a book snapshot
    pub fn book_key(&self) -> &'static str {
        match self {
            Self::Bid => "bids",
            Self::Ask => "asks",
        }
    }
}

impl From<bool> for BookSide {
    fn from(is_bid: bool) -> Self {
        if is_bid {
            Self::Bid
        } else {
            Self::Ask
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: f64,
    pub volume: f64,
}

impl OrderBookLevel {
    pub fn new(price: f64, volume: f64) -> Self {
        Self { price, volume }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
}

impl OrderBook {
    pub fn side(&self, side: BookSide) -> &[OrderBookLevel] {
        match side {
            BookSide::Bid => &self.bids,
            BookSide::Ask => &self.asks,
        }
    }
}
