//! Environment-driven configuration for providers, the exchange store, and
//! the response cache.

use std::path::PathBuf;
use std::time::Duration;

pub const ALPHA_VANTAGE_API_KEY: &str = "ALPHA_VANTAGE_API_KEY";
pub const MARKETSTACK_API_KEY: &str = "MARKETSTACK_API_KEY";
pub const OPENFIGI_API_KEY: &str = "OPENFIGI_API_KEY";

const DEFAULT_EXCHANGES_FILE: &str = "data/exchanges.json";
const DEFAULT_CACHE_DIR: &str = "data/cache";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_PROVIDER: &str = "yahoo";

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub alpha_vantage_api_key: Option<String>,
    pub marketstack_api_key: Option<String>,
    pub openfigi_api_key: Option<String>,
    /// Bundled exchange reference table (`{"exchanges": [...]}`)
    pub exchanges_file: PathBuf,
    /// Directory holding the response cache files
    pub cache_dir: PathBuf,
    /// Upper bound for every upstream HTTP request
    pub request_timeout: Duration,
    pub default_provider: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            marketstack_api_key: None,
            openfigi_api_key: None,
            exchanges_file: PathBuf::from(DEFAULT_EXCHANGES_FILE),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            default_provider: DEFAULT_PROVIDER.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Read the configuration from the process environment, loading a
    /// `.env` file first when one exists.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let timeout_ms: u64 = var("TICKERDEX_REQUEST_TIMEOUT_MS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            alpha_vantage_api_key: var(ALPHA_VANTAGE_API_KEY),
            marketstack_api_key: var(MARKETSTACK_API_KEY),
            openfigi_api_key: var(OPENFIGI_API_KEY),
            exchanges_file: var("TICKERDEX_EXCHANGES_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXCHANGES_FILE)),
            cache_dir: var("TICKERDEX_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            request_timeout: Duration::from_millis(timeout_ms),
            default_provider: var("TICKERDEX_DEFAULT_PROVIDER")
                .map(|value| value.to_lowercase())
                .unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
        }
    }

    pub fn with_alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    pub fn with_marketstack_api_key(mut self, key: impl Into<String>) -> Self {
        self.marketstack_api_key = Some(key.into());
        self
    }

    pub fn with_openfigi_api_key(mut self, key: impl Into<String>) -> Self {
        self.openfigi_api_key = Some(key.into());
        self
    }

    pub fn with_exchanges_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.exchanges_file = path.into();
        self
    }

    pub fn with_cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_dir = path.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
