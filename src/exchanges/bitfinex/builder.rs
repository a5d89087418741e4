use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::exchanges::bitfinex::connector::BitfinexConnector;
use crate::exchanges::bitfinex::signer::BitfinexSigner;
use std::sync::Arc;

pub const BITFINEX_API_URL: &str = "https://api.bitfinex.com";

/// Build the transport for a configuration
///
/// The signer is always attached: Bitfinex rejects bad credentials itself,
/// and that rejection is surfaced through the response like any other
/// protocol error.
pub fn build_rest(config: &ExchangeConfig) -> Result<ReqwestRest, ExchangeError> {
    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| BITFINEX_API_URL.to_string());

    let rest_config = RestClientConfig::new(base_url, "bitfinex".to_string())
        .with_timeout(30)
        .with_cacert(config.cacert.clone());

    let signer = Arc::new(BitfinexSigner::new(
        config.api_key().to_string(),
        config.secret_key().to_string(),
    ));

    RestClientBuilder::new(rest_config).with_signer(signer).build()
}

/// Create a Bitfinex connector backed by `reqwest`
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<BitfinexConnector<ReqwestRest>, ExchangeError> {
    let rest = build_rest(&config)?;
    Ok(BitfinexConnector::new(rest, &config))
}
