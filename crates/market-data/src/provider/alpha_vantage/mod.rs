//! Alpha Vantage exchange data provider.
//!
//! Exchanges come from the bundled [`ExchangeStore`]; symbol search uses the
//! `SYMBOL_SEARCH` function. The API key is only needed for search and is
//! checked when search is called, so listing exchanges works without one.
//!
//! Note: Alpha Vantage reports rate limiting with HTTP 200 and a `Note` or
//! `Information` field in the body.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::cache::{CacheNamespace, ResponseCache, SYMBOL_SEARCH_TTL};
use crate::config::ALPHA_VANTAGE_API_KEY;
use crate::errors::{MarketDataError, UpstreamFailure};
use crate::mapping::alpha_vantage::region_to_exchange;
use crate::mapping::{normalize_security_type, suffix_for};
use crate::models::{Exchange, ExchangeSummary, SearchType, SymbolResult};
use crate::provider::search::{symbol_search_cache_key, SymbolCollector};
use crate::provider::{http, listing, ExchangeDataProvider, ProviderCapabilities};
use crate::store::ExchangeStore;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "alphavantage";
const PROVIDER_NAME: &str = "Alpha Vantage";

/// Outcome of matching a region against the store.
#[derive(Debug)]
enum RegionMatch {
    Exchange(Exchange),
    /// The region is a country with several listed venues.
    Ambiguous(Vec<String>),
    Unknown,
}

/// Alpha Vantage provider.
pub struct AlphaVantageProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    store: Arc<ExchangeStore>,
    cache: CacheNamespace,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// SYMBOL_SEARCH response
#[derive(Debug, Deserialize)]
struct SymbolSearchResponse {
    #[serde(rename = "bestMatches", default)]
    best_matches: Vec<SymbolMatch>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SymbolMatch {
    #[serde(rename = "1. symbol")]
    symbol: Option<String>,
    #[serde(rename = "2. name")]
    name: Option<String>,
    #[serde(rename = "3. type")]
    security_type: Option<String>,
    #[serde(rename = "4. region")]
    region: Option<String>,
    #[serde(rename = "8. currency")]
    currency: Option<String>,
}

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider. `api_key` may be absent.
    pub fn new(
        api_key: Option<String>,
        store: Arc<ExchangeStore>,
        cache: &ResponseCache,
        timeout: Duration,
    ) -> Self {
        Self {
            client: http::build_client(timeout),
            base_url: BASE_URL.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            store,
            cache: cache.namespace(PROVIDER_ID),
        }
    }

    /// Point the provider at another query endpoint (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_key(&self) -> Result<&str, MarketDataError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| MarketDataError::MissingApiKey {
                provider: PROVIDER_NAME.to_string(),
                env_var: ALPHA_VANTAGE_API_KEY.to_string(),
            })
    }

    /// Make a request to the Alpha Vantage API.
    async fn fetch(&self, api_key: &str, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", api_key));

        let url = reqwest::Url::parse_with_params(&self.base_url, &all_params).map_err(|e| {
            MarketDataError::provider(PROVIDER_NAME, format!("Failed to build URL: {}", e))
        })?;

        debug!(
            "Alpha Vantage request: {}",
            http::mask(url.as_str(), Some(api_key))
        );

        http::send(PROVIDER_NAME, self.client.get(url)).await
    }

    /// Check for API-level errors in the response.
    fn check_api_error(
        error_message: &Option<String>,
        note: &Option<String>,
        information: &Option<String>,
    ) -> Result<(), MarketDataError> {
        if let Some(ref msg) = error_message {
            return Err(MarketDataError::provider(PROVIDER_NAME, msg.clone()));
        }

        // "Note" usually indicates rate limiting
        for msg in [note, information].into_iter().flatten() {
            if msg.contains("API call frequency") || msg.contains("rate limit") {
                return Err(MarketDataError::Upstream {
                    provider: PROVIDER_NAME.to_string(),
                    failure: UpstreamFailure::RateLimited,
                });
            }
            warn!("Alpha Vantage notice: {}", msg);
        }

        Ok(())
    }

    /// Resolve a `4. region` value against the store.
    ///
    /// Tries the region as an exchange code, then the region table, then a
    /// country with exactly one exchange. A country with several exchanges
    /// yields their codes without picking one.
    fn resolve_region(&self, region: &str) -> RegionMatch {
        if region.is_empty() {
            return RegionMatch::Unknown;
        }
        let listed = self
            .store
            .get(region)
            .or_else(|| region_to_exchange(region).and_then(|code| self.store.get(code)));
        if let Some(exchange) = listed {
            return RegionMatch::Exchange(exchange);
        }

        let mut by_country = self.store.by_country(region);
        match by_country.len() {
            0 => RegionMatch::Unknown,
            1 => by_country
                .pop()
                .map_or(RegionMatch::Unknown, RegionMatch::Exchange),
            _ => RegionMatch::Ambiguous(by_country.into_iter().map(|e| e.code).collect()),
        }
    }

    async fn symbol_search(&self, api_key: &str, query: &str) -> Result<Vec<SymbolMatch>, MarketDataError> {
        debug!("Alpha Vantage symbol search: {}", query);
        let text = self
            .fetch(api_key, &[("function", "SYMBOL_SEARCH"), ("keywords", query)])
            .await?;
        let response: SymbolSearchResponse = http::parse(PROVIDER_NAME, &text)?;
        Self::check_api_error(
            &response.error_message,
            &response.note,
            &response.information,
        )?;
        Ok(response.best_matches)
    }

    fn collect(
        &self,
        matches: Vec<SymbolMatch>,
        query: &str,
        exchange: Option<&str>,
        search_type: SearchType,
    ) -> Vec<SymbolResult> {
        let mut collector = SymbolCollector::new(query, exchange, search_type);
        let filter = collector.exchange_filter().map(str::to_string);

        for item in matches {
            let (Some(symbol), Some(name)) = (item.symbol.as_deref(), item.name.as_deref()) else {
                continue;
            };
            if symbol.is_empty() || name.is_empty() {
                continue;
            }

            let region = item.region.as_deref().unwrap_or_default();
            let (listing, code) = match self.resolve_region(region) {
                RegionMatch::Exchange(exchange) => {
                    let code = exchange.code.clone();
                    (Some(exchange), Some(code))
                }
                // The listing may be on the requested venue; it stays unlabelled.
                RegionMatch::Ambiguous(codes) => {
                    let code = filter.as_ref().filter(|f| codes.contains(f)).cloned();
                    (None, code)
                }
                RegionMatch::Unknown => (None, None),
            };

            collector.offer(symbol.to_string(), symbol, name, code.as_deref(), || {
                let (display, suffix) = match &listing {
                    Some(exchange) => (
                        exchange.name.as_str(),
                        suffix_for(symbol, &exchange.code, &exchange.name),
                    ),
                    None => (region, ""),
                };
                let security_type =
                    normalize_security_type(item.security_type.as_deref().unwrap_or_default());
                let mut result = SymbolResult::new(symbol, name, display, security_type, suffix);
                if !region.is_empty() {
                    result = result.with_country(region);
                }
                if let Some(currency) = item.currency.as_deref().filter(|c| !c.is_empty()) {
                    result = result.with_currency(currency);
                }
                result
            });
        }

        debug!("Found {} results", collector.len());
        collector.finish()
    }
}

#[async_trait]
impl ExchangeDataProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            live_exchange_listing: false,
            supports_symbol_search: true,
            requires_api_key: true,
        }
    }

    async fn get_all_exchanges(&self) -> Vec<ExchangeSummary> {
        listing::store_exchanges(&self.store)
    }

    async fn get_exchange(&self, code: &str) -> Option<ExchangeSummary> {
        self.store.get(code).map(|exchange| exchange.summary())
    }

    async fn search_symbols(
        &self,
        query: &str,
        exchange: Option<&str>,
        search_type: SearchType,
    ) -> Result<Vec<SymbolResult>, MarketDataError> {
        let api_key = self.api_key()?;

        let cache_key = symbol_search_cache_key(query, exchange, search_type);
        if let Some(cached) = self.cache.read::<Vec<SymbolResult>>(&cache_key, SYMBOL_SEARCH_TTL) {
            return Ok(cached);
        }

        let matches = match self.symbol_search(api_key, query).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("{} search error: {}", PROVIDER_NAME, e);
                return Ok(Vec::new());
            }
        };

        let results = self.collect(matches, query, exchange, search_type);
        if !results.is_empty() {
            self.cache.write(&cache_key, &results);
        }
        Ok(results)
    }
}
