use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::path::PathBuf;

/// Default multiplier applied to a target volume when scanning book depth
pub const DEFAULT_ORDER_BOOK_FACTOR: f64 = 3.0;

/// Default traded pair
pub const DEFAULT_SYMBOL: &str = "btcusd";

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub base_url: Option<String>,
    /// PEM bundle trusted in addition to the system roots
    pub cacert: Option<PathBuf>,
    pub order_book_factor: f64,
    pub symbol: String,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 6)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("cacert", &self.cacert)?;
        state.serialize_field("order_book_factor", &self.order_book_factor)?;
        state.serialize_field("symbol", &self.symbol)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            #[serde(default)]
            base_url: Option<String>,
            #[serde(default)]
            cacert: Option<PathBuf>,
            #[serde(default = "default_order_book_factor")]
            order_book_factor: f64,
            #[serde(default = "default_symbol")]
            symbol: String,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            base_url: helper.base_url,
            cacert: helper.cacert,
            order_book_factor: helper.order_book_factor,
            symbol: helper.symbol,
        })
    }
}

fn default_order_book_factor() -> f64 {
    DEFAULT_ORDER_BOOK_FACTOR
}

fn default_symbol() -> String {
    DEFAULT_SYMBOL.to_string()
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            base_url: None,
            cacert: None,
            order_book_factor: DEFAULT_ORDER_BOOK_FACTOR,
            symbol: default_symbol(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{EXCHANGE}_API_KEY` (e.g., `BITFINEX_API_KEY`)
    /// - `{EXCHANGE}_SECRET_KEY` (e.g., `BITFINEX_SECRET_KEY`)
    /// - `{EXCHANGE}_BASE_URL` (optional)
    /// - `{EXCHANGE}_CACERT` (optional, path to a PEM bundle)
    /// - `{EXCHANGE}_ORDER_BOOK_FACTOR` (optional, defaults to 3.0)
    /// - `{EXCHANGE}_SYMBOL` (optional, defaults to `btcusd`)
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let prefix = exchange_prefix.to_uppercase();
        let api_key_var = format!("{}_API_KEY", prefix);
        let secret_key_var = format!("{}_SECRET_KEY", prefix);

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;

        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        Self::new(api_key, secret_key).with_env_overrides(&prefix)
    }

    /// Create a read-only configuration, still honouring the optional
    /// environment overrides (base URL, CA bundle, factor, symbol)
    pub fn read_only_from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::read_only().with_env_overrides(&exchange_prefix.to_uppercase())
    }

    fn with_env_overrides(mut self, prefix: &str) -> Result<Self, ConfigError> {
        if let Ok(base_url) = env::var(format!("{}_BASE_URL", prefix)) {
            self.base_url = Some(base_url);
        }

        if let Ok(cacert) = env::var(format!("{}_CACERT", prefix)) {
            self.cacert = Some(PathBuf::from(cacert));
        }

        let factor_var = format!("{}_ORDER_BOOK_FACTOR", prefix);
        if let Ok(raw) = env::var(&factor_var) {
            let factor = parse_order_book_factor(&raw).map_err(|reason| {
                ConfigError::InvalidConfiguration(format!("{}: {}", factor_var, reason))
            })?;
            self.order_book_factor = factor;
        }

        if let Ok(symbol) = env::var(format!("{}_SYMBOL", prefix)) {
            self.symbol = symbol.to_lowercase();
        }

        Ok(self)
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(exchange_prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        exchange_prefix: &str,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // fall back to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(exchange_prefix)
    }

    /// Load configuration with automatic .env file detection
    ///
    /// Tries, in order: `.env.local`, `.env.{ENVIRONMENT}`, `.env`.
    /// Only the first file found is loaded.
    #[cfg(feature = "env-file")]
    pub fn from_env_auto(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let env_files = [
            ".env.local".to_string(),
            format!(
                ".env.{}",
                env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
            ),
            ".env".to_string(),
        ];

        for env_file in &env_files {
            match dotenv::from_path(env_file) {
                Ok(()) => break,
                Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(ConfigError::InvalidConfiguration(format!(
                        "Failed to load .env file '{}': {}",
                        env_file, e
                    )));
                }
            }
        }

        Self::from_env(exchange_prefix)
    }

    /// Create configuration for read-only operations (market data only)
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Check if this configuration has valid credentials for authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Trust an additional PEM certificate bundle
    #[must_use]
    pub fn cacert(mut self, path: impl Into<PathBuf>) -> Self {
        self.cacert = Some(path.into());
        self
    }

    #[must_use]
    pub fn order_book_factor(mut self, factor: f64) -> Self {
        self.order_book_factor = factor;
        self
    }

    #[must_use]
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into().to_lowercase();
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

fn parse_order_book_factor(raw: &str) -> Result<f64, String> {
    let factor = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("not a number ({})", e))?;
    if !factor.is_finite() || factor <= 0.0 {
        return Err(format!("must be a positive number, got {}", factor));
    }
    Ok(factor)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
