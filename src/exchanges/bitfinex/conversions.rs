//! Field extraction from Bitfinex documents.
//!
//! Bitfinex encodes decimals as strings and omits fields on error. These
//! helpers report absence as `None` and leave the fallback to the caller.

use super::types::BitfinexBalance;
use crate::core::types::{BookSide, OrderBook, OrderBookLevel, Quote};
use serde_json::Value;
use tracing::warn;

/// Decimal field encoded as a string (or, leniently, a JSON number)
pub fn decimal_field(value: &Value, key: &str) -> Option<f64> {
    let parsed = match value.get(key)? {
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        Value::Number(number) => number.as_f64()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

pub fn bool_field(value: &Value, key: &str) -> Option<bool> {
    value.get(key)?.as_bool()
}

pub fn integer_field(value: &Value, key: &str) -> Option<i64> {
    value.get(key)?.as_i64()
}

pub fn convert_quote(ticker: &Value) -> Quote {
    Quote {
        bid: decimal_field(ticker, "bid").unwrap_or(0.0),
        ask: decimal_field(ticker, "ask").unwrap_or(0.0),
    }
}

/// Levels of one book side, in the order the exchange sent them
///
/// Unreadable prices or amounts count as 0.0 so the level still occupies
/// its place in the walk.
pub fn convert_book_side(book: &Value, side: BookSide) -> Vec<OrderBookLevel> {
    book.get(side.book_key())
        .and_then(Value::as_array)
        .map(|levels| {
            levels
                .iter()
                .map(|level| OrderBookLevel {
                    price: decimal_field(level, "price").unwrap_or(0.0),
                    volume: decimal_field(level, "amount").unwrap_or(0.0),
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn convert_order_book(book: &Value) -> OrderBook {
    OrderBook {
        bids: convert_book_side(book, BookSide::Bid),
        asks: convert_book_side(book, BookSide::Ask),
    }
}

/// Amount of the first `"trading"` wallet holding `currency`, in response order
///
/// Entries that do not have the expected shape are logged and skipped.
pub fn find_trading_balance(balances: &Value, currency: &str) -> Option<f64> {
    let entries = balances.as_array()?;

    for entry in entries {
        let balance: BitfinexBalance = match serde_json::from_value(entry.clone()) {
            Ok(balance) => balance,
            Err(e) => {
                warn!(exchange = "bitfinex", error = %e, "Error with JSON balance entry");
                continue;
            }
        };

        if balance.wallet_type != "trading" || !balance.currency.eq_ignore_ascii_case(currency) {
            continue;
        }

        match balance.amount.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => return Some(amount),
            _ => warn!(
                exchange = "bitfinex",
                amount = %balance.amount,
                "Unreadable balance amount"
            ),
        }
    }

    None
}

/// Amount of the first open position; `None` when there are no positions
pub fn first_position_amount(positions: &Value) -> Option<Option<f64>> {
    positions
        .as_array()?
        .first()
        .map(|position| decimal_field(position, "amount"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_field() {
        let value = json!({"a": "1.25", "b": 2.5, "c": "abc", "d": null, "e": " 3 ", "f": "NaN"});
        assert_eq!(decimal_field(&value, "a"), Some(1.25));
        assert_eq!(decimal_field(&value, "b"), Some(2.5));
        assert_eq!(decimal_field(&value, "c"), None);
        assert_eq!(decimal_field(&value, "d"), None);
        assert_eq!(decimal_field(&value, "e"), Some(3.0));
        assert_eq!(decimal_field(&value, "f"), None);
        assert_eq!(decimal_field(&value, "missing"), None);
    }

    #[test]
    fn test_convert_quote_defaults_missing_sides() {
        let quote = convert_quote(&json!({"bid": "27000.5", "last_price": "27001"}));
        assert_eq!(quote, Quote::new(27000.5, 0.0));
    }

    #[test]
    fn test_convert_quote_with_error_field_keeps_data() {
        let quote = convert_quote(&json!({"message": "partial", "bid": "1.5", "ask": "1.6"}));
        assert_eq!(quote, Quote::new(1.5, 1.6));
    }

    #[test]
    fn test_convert_order_book() {
        let book = json!({
            "bids": [
                {"price": "100.0", "amount": "1.0", "timestamp": "1"},
                {"price": "99.0", "amount": "2.0", "timestamp": "1"}
            ],
            "asks": [
                {"price": "101.0", "amount": "bad", "timestamp": "1"}
            ]
        });

        let converted = convert_order_book(&book);
        assert_eq!(
            converted.bids,
            vec![OrderBookLevel::new(100.0, 1.0), OrderBookLevel::new(99.0, 2.0)]
        );
        assert_eq!(converted.asks, vec![OrderBookLevel::new(101.0, 0.0)]);
        assert!(convert_book_side(&json!({}), BookSide::Bid).is_empty());
    }

    #[test]
    fn test_find_trading_balance_first_match_wins() {
        let balances = json!([
            {"type": "exchange", "currency": "btc", "amount": "9.0", "available": "9.0"},
            {"type": "trading", "currency": "btc", "amount": "1.5", "available": "1.0"},
            {"type": "trading", "currency": "btc", "amount": "2.5", "available": "2.0"}
        ]);
        assert_eq!(find_trading_balance(&balances, "BTC"), Some(1.5));
    }

    #[test]
    fn test_find_trading_balance_skips_malformed_entries() {
        let balances = json!([
            {"type": "trading", "currency": "usd"},
            {"type": "trading", "currency": 5, "amount": "1"},
            "garbage",
            {"type": "trading", "currency": "usd", "amount": "250.75"}
        ]);
        assert_eq!(find_trading_balance(&balances, "usd"), Some(250.75));
    }

    #[test]
    fn test_find_trading_balance_no_match() {
        let balances = json!([
            {"type": "exchange", "currency": "btc", "amount": "1.0"},
            {"type": "trading", "currency": "usd", "amount": "10.0"}
        ]);
        assert_eq!(find_trading_balance(&balances, "BTC"), None);
        assert_eq!(find_trading_balance(&json!({"message": "Invalid"}), "BTC"), None);
    }

    #[test]
    fn test_first_position_amount() {
        assert_eq!(first_position_amount(&json!([])), None);
        assert_eq!(first_position_amount(&json!({"message": "x"})), None);
        assert_eq!(
            first_position_amount(&json!([{"amount": "-0.25"}, {"amount": "3"}])),
            Some(Some(-0.25))
        );
        assert_eq!(first_position_amount(&json!([{"symbol": "btcusd"}])), Some(None));
    }

    #[test]
    fn test_bool_and_integer_fields() {
        let status = json!({"is_live": false, "order_id": 448_411_153});
        assert_eq!(bool_field(&status, "is_live"), Some(false));
        assert_eq!(bool_field(&json!({"is_live": "false"}), "is_live"), None);
        assert_eq!(integer_field(&status, "order_id"), Some(448_411_153));
        assert_eq!(integer_field(&json!({}), "order_id"), None);
    }
}
