/// Transport kernel shared by exchange connectors
///
/// The kernel holds only transport concerns: the `RestClient` seam, its
/// `reqwest` implementation, and the `Signer` interface that exchange
/// modules implement for authenticated calls. No exchange-specific logic
/// lives here.
///
/// # Usage
///
/// ```rust,no_run
/// use bfxadapter::core::kernel::*;
/// use bfxadapter::exchanges::bitfinex::BitfinexSigner;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rest_config = RestClientConfig::new(
///     "https://api.bitfinex.com".to_string(),
///     "bitfinex".to_string(),
/// );
/// let signer = Arc::new(BitfinexSigner::new("key".to_string(), "secret".to_string()));
/// let rest = RestClientBuilder::new(rest_config)
///     .with_signer(signer)
///     .build()?;
///
/// let ticker = rest.get("/v1/ticker/btcusd", &[], false).await?;
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{SignatureResult, SignedRequest, Signer};
