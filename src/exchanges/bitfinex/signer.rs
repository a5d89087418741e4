use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{split_query_string, SignatureResult, SignedRequest, Signer};
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha384;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

type HmacSha384 = Hmac<Sha384>;

pub const HEADER_API_KEY: &str = "X-BFX-APIKEY";
pub const HEADER_SIGNATURE: &str = "X-BFX-SIGNATURE";
pub const HEADER_PAYLOAD: &str = "X-BFX-PAYLOAD";

/// Issues strictly increasing nonces derived from the wall clock
///
/// Each value is `max(timestamp, last + 1)`, so a clock that steps backward
/// or two requests in the same millisecond still yield increasing nonces.
/// Safe to share between tasks.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: AtomicU64,
}

impl NonceGenerator {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Next nonce for a request issued at `timestamp_ms`
    pub fn next(&self, timestamp_ms: u64) -> u64 {
        let advance = |last: u64| timestamp_ms.max(last.saturating_add(1));
        match self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(advance(last)))
        {
            Ok(previous) | Err(previous) => advance(previous),
        }
    }

    /// Most recently issued nonce, 0 before the first call
    pub fn last_issued(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }
}

/// One signed request: the encoded payload and its signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub request: String,
    pub nonce: u64,
    /// Base64 of the compact JSON document
    pub payload: String,
    /// Lowercase hex HMAC-SHA384 of `payload`
    pub signature: String,
}

/// Build the JSON document that gets signed: `request`, `nonce` (as a
/// string) and the caller fields merged at the top level
pub fn build_payload_document(
    request: &str,
    nonce: u64,
    fields: &[u8],
) -> Result<Value, ExchangeError> {
    let mut document = if fields.is_empty() {
        Map::new()
    } else {
        match serde_json::from_slice::<Value>(fields)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ExchangeError::InvalidParameters(format!(
                    "Signed request fields must be a JSON object, got {}",
                    other
                )))
            }
        }
    };

    document.insert("request".to_string(), Value::String(request.to_string()));
    document.insert("nonce".to_string(), Value::String(nonce.to_string()));

    Ok(Value::Object(document))
}

/// Signer for Bitfinex v1 authenticated endpoints
///
/// The whole request travels in headers; the HTTP body is left empty.
pub struct BitfinexSigner {
    api_key: String,
    secret_key: String,
    nonces: NonceGenerator,
}

impl std::fmt::Debug for BitfinexSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitfinexSigner")
            .field("api_key", &"[REDACTED]")
            .field("last_nonce", &self.nonces.last_issued())
            .finish_non_exhaustive()
    }
}

impl BitfinexSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key,
            nonces: NonceGenerator::new(),
        }
    }

    pub fn nonces(&self) -> &NonceGenerator {
        &self.nonces
    }

    /// Hex HMAC-SHA384 of `payload` keyed by the API secret
    fn generate_signature(&self, payload: &str) -> Result<String, ExchangeError> {
        let mut mac = HmacSha384::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| ExchangeError::AuthError(format!("Failed to create HMAC: {}", e)))?;

        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Stamp, encode and sign a request
    pub fn envelope(
        &self,
        request: &str,
        fields: &[u8],
        timestamp: u64,
    ) -> Result<Envelope, ExchangeError> {
        let nonce = self.nonces.next(timestamp);
        let document = build_payload_document(request, nonce, fields)?;
        let json = serde_json::to_string(&document)
            .map_err(|e| ExchangeError::SerializationError(e.to_string()))?;

        let payload = general_purpose::STANDARD.encode(json.as_bytes());
        let signature = self.generate_signature(&payload)?;

        Ok(Envelope {
            request: request.to_string(),
            nonce,
            payload,
            signature,
        })
    }
}

impl Signer for BitfinexSigner {
    fn sign_request(
        &self,
        _method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        let envelope = self.envelope(endpoint, body, timestamp)?;

        let mut headers = HashMap::new();
        headers.insert(HEADER_API_KEY.to_string(), self.api_key.clone());
        headers.insert(HEADER_SIGNATURE.to_string(), envelope.signature);
        headers.insert(HEADER_PAYLOAD.to_string(), envelope.payload);

        Ok(SignedRequest {
            headers,
            query_params: split_query_string(query_string),
            body: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn decode_payload(payload: &str) -> Value {
        let bytes = general_purpose::STANDARD.decode(payload).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_nonce_follows_clock() {
        let nonces = NonceGenerator::new();
        assert_eq!(nonces.next(1_000), 1_000);
        assert_eq!(nonces.next(2_000), 2_000);
        assert_eq!(nonces.last_issued(), 2_000);
    }

    #[test]
    fn test_nonce_clamps_when_clock_goes_backward() {
        let nonces = NonceGenerator::new();
        assert_eq!(nonces.next(5_000), 5_000);
        assert_eq!(nonces.next(4_000), 5_001);
        assert_eq!(nonces.next(5_001), 5_002);
        assert_eq!(nonces.next(9_000), 9_000);
    }

    #[test]
    fn test_nonce_strictly_increasing_across_threads() {
        let nonces = Arc::new(NonceGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let nonces = Arc::clone(&nonces);
                std::thread::spawn(move || (0..250).map(|_| nonces.next(42)).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        for per_thread in all.chunks(250) {
            assert!(per_thread.windows(2).all(|w| w[0] < w[1]));
        }
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 1_000);
    }

    #[test]
    fn test_payload_contains_request_nonce_and_fields() {
        let signer = BitfinexSigner::new("key".to_string(), "secret".to_string());
        let fields = serde_json::to_vec(&json!({"symbol": "btcusd", "amount": "0.5"})).unwrap();

        let envelope = signer.envelope("/v1/order/new", &fields, 1_700_000_000_123).unwrap();
        let decoded = decode_payload(&envelope.payload);

        assert_eq!(
            decoded,
            json!({
                "request": "/v1/order/new",
                "nonce": "1700000000123",
                "symbol": "btcusd",
                "amount": "0.5",
            })
        );
        assert_eq!(decoded.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_payload_without_fields() {
        let signer = BitfinexSigner::new("key".to_string(), "secret".to_string());
        let envelope = signer.envelope("/v1/balances", &[], 7).unwrap();
        assert_eq!(
            decode_payload(&envelope.payload),
            json!({"request": "/v1/balances", "nonce": "7"})
        );
    }

    #[test]
    fn test_reserved_keys_win_over_fields() {
        let document =
            build_payload_document("/v1/positions", 9, br#"{"request":"/evil","nonce":"1"}"#)
                .unwrap();
        assert_eq!(document, json!({"request": "/v1/positions", "nonce": "9"}));
    }

    #[test]
    fn test_non_object_fields_rejected() {
        let result = build_payload_document("/v1/balances", 1, b"[1,2]");
        assert!(matches!(result, Err(ExchangeError::InvalidParameters(_))));
    }

    #[test]
    fn test_payload_base64_round_trip() {
        let signer = BitfinexSigner::new("key".to_string(), "secret".to_string());
        let envelope = signer.envelope("/v1/balances", &[], 123).unwrap();

        let document = build_payload_document("/v1/balances", envelope.nonce, &[]).unwrap();
        let json = serde_json::to_string(&document).unwrap();
        let bytes = general_purpose::STANDARD.decode(&envelope.payload).unwrap();
        assert_eq!(bytes, json.into_bytes());
    }

    #[test]
    fn test_signature_is_hmac_sha384_hex_of_payload() {
        let signer = BitfinexSigner::new("key".to_string(), "secret".to_string());
        let envelope = signer.envelope("/v1/balances", &[], 123).unwrap();

        let mut mac = HmacSha384::new_from_slice(b"secret").unwrap();
        mac.update(envelope.payload.as_bytes());
        mac.verify_slice(&hex::decode(&envelope.signature).unwrap())
            .unwrap();

        assert_eq!(envelope.signature.len(), 96);
        assert!(envelope
            .signature
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_empty_credentials_still_sign() {
        let signer = BitfinexSigner::new(String::new(), String::new());
        let signed = signer
            .sign_request("POST", "/v1/balances", "", &[], 1)
            .unwrap();
        assert_eq!(signed.headers.get(HEADER_API_KEY).map(String::as_str), Some(""));
        assert!(signed.headers.contains_key(HEADER_SIGNATURE));
    }

    #[test]
    fn test_sign_request_moves_everything_into_headers() {
        let signer = BitfinexSigner::new("my_key".to_string(), "my_secret".to_string());
        let body = serde_json::to_vec(&json!({"order_id": 448_364_249})).unwrap();

        let signed = signer
            .sign_request("POST", "/v1/order/status", "", &body, 1_000)
            .unwrap();

        assert!(signed.body.is_empty());
        assert!(signed.query_params.is_empty());
        assert_eq!(signed.headers.len(), 3);
        assert_eq!(signed.headers[HEADER_API_KEY], "my_key");

        let decoded = decode_payload(&signed.headers[HEADER_PAYLOAD]);
        assert_eq!(decoded["order_id"], json!(448_364_249));
        assert_eq!(decoded["request"], json!("/v1/order/status"));
        assert_eq!(decoded["nonce"], json!("1000"));
    }

    #[test]
    fn test_debug_hides_credentials() {
        let signer = BitfinexSigner::new("my_key".to_string(), "my_secret".to_string());
        let debug = format!("{:?}", signer);
        assert!(!debug.contains("my_key"));
        assert!(!debug.contains("my_secret"));
    }
}
