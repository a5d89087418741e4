pub mod conversions;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

// Re-export main components
pub use builder::{build_connector, build_rest, BITFINEX_API_URL};
pub use connector::{depth_weighted_price, Account, BitfinexConnector, MarketData, Trading};
pub use rest::{check_response, BitfinexRest};
pub use signer::{BitfinexSigner, Envelope, NonceGenerator};
pub use types::{BitfinexBalance, BitfinexNewOrder, BitfinexOrderStatusRequest};
