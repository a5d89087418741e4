use crate::core::errors::ExchangeError;
use std::collections::HashMap;

/// Everything an authenticated request needs on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedRequest {
    /// Headers to attach to the request
    pub headers: HashMap<String, String>,
    /// Query parameters to attach to the request
    pub query_params: Vec<(String, String)>,
    /// Body bytes to send; empty means no body
    pub body: Vec<u8>,
}

/// Result type for signing operations
pub type SignatureResult = Result<SignedRequest, ExchangeError>;

/// Signer trait for request authentication
///
/// Implementations own the exchange-specific signing logic. The transport
/// calls the signer once per authenticated request and sends exactly what
/// it returns, so a signer may move the request data out of the body and
/// into headers.
pub trait Signer: Send + Sync {
    /// Sign a request
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `endpoint` - API endpoint path
    /// * `query_string` - Query string (without leading '?')
    /// * `body` - Raw request body bytes as supplied by the caller
    /// * `timestamp` - Wall-clock time in milliseconds
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult;
}

/// Split a `k=v&k2=v2` query string back into pairs
pub fn split_query_string(query_string: &str) -> Vec<(String, String)> {
    if query_string.is_empty() {
        return Vec::new();
    }

    query_string
        .split('&')
        .filter_map(|param| {
            param
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
        })
        .collect()
}
