//! OpenFIGI exchange data provider.
//!
//! Exchanges come from the bundled [`ExchangeStore`]; symbol search uses the
//! `POST /search` endpoint. An API key is optional and only raises the
//! upstream rate limit.
//!
//! OpenFIGI returns one row per listing (every venue, every share class), so
//! results go through [`is_valid_listing`] before anything else.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheNamespace, ResponseCache, SYMBOL_SEARCH_TTL};
use crate::errors::MarketDataError;
use crate::mapping::normalize_security_type;
use crate::mapping::openfigi::{exchange_to_figi_exchange, figi_exchange_to_exchange};
use crate::models::{ExchangeSummary, SearchType, SymbolResult};
use crate::provider::search::{normalize_exchange, symbol_search_cache_key, SymbolCollector};
use crate::provider::{http, listing, ExchangeDataProvider, ProviderCapabilities};
use crate::store::ExchangeStore;

const BASE_URL: &str = "https://api.openfigi.com/v3";
const PROVIDER_ID: &str = "openfigi";
const PROVIDER_NAME: &str = "OpenFIGI";
const API_KEY_HEADER: &str = "X-OPENFIGI-APIKEY";
const DEFAULT_CURRENCY: &str = "USD";

/// OpenFIGI provider.
pub struct OpenFigiProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    store: Arc<ExchangeStore>,
    cache: CacheNamespace,
}

// ============================================================================
// Request / response structures
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    exch_code: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<FigiListing>,
    #[serde(default)]
    error: Option<String>,
}

/// One OpenFIGI listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FigiListing {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exch_code: Option<String>,
    #[serde(rename = "compositeFIGI", default)]
    pub composite_figi: Option<String>,
    #[serde(default)]
    pub security_type: Option<String>,
    #[serde(default)]
    pub security_type2: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Whether a listing is a primary equity or fund line.
///
/// Keeps common stock, ETFs and ETPs; drops depositary receipts and
/// derivatives.
pub(crate) fn is_valid_listing(item: &FigiListing) -> bool {
    let security_type = item.security_type.as_deref().unwrap_or_default();
    let security_type2 = item.security_type2.as_deref().unwrap_or_default();

    if !["Common Stock", "ETF", "ETP"]
        .iter()
        .any(|kind| security_type.contains(kind))
    {
        return false;
    }
    if ["Depositary Receipt", "DR", "CEDEAR"]
        .iter()
        .any(|kind| security_type2.contains(kind))
    {
        return false;
    }
    !["WRT", "Option", "Future"]
        .iter()
        .any(|kind| security_type.contains(kind))
}

impl OpenFigiProvider {
    /// Create a new OpenFIGI provider. `api_key` may be absent.
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

    /// Point the provider at another API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn search(
        &self,
        query: &str,
        exchange: Option<&str>,
    ) -> Result<Vec<FigiListing>, MarketDataError> {
        let body = SearchRequest {
            query,
            exch_code: normalize_exchange(exchange)
                .and_then(|code| exchange_to_figi_exchange(&code)),
        };
        debug!("Making OpenFIGI search request: {:?}", body);

        let mut request = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let text = http::send(PROVIDER_NAME, request).await?;
        let response: SearchResponse = http::parse(PROVIDER_NAME, &text)?;
        if let Some(error) = response.error {
            return Err(MarketDataError::provider(PROVIDER_NAME, error));
        }
        Ok(response.data)
    }

    fn collect(
        &self,
        listings: Vec<FigiListing>,
        query: &str,
        exchange: Option<&str>,
        search_type: SearchType,
    ) -> Vec<SymbolResult> {
        let mut collector = SymbolCollector::new(query, exchange, search_type);

        for item in listings.iter().filter(|item| is_valid_listing(item)) {
            let Some(symbol) = item.ticker.as_deref().filter(|t| !t.is_empty()) else {
                continue;
            };
            let exch_code = item.exch_code.as_deref().unwrap_or_default();
            let Some(code) = figi_exchange_to_exchange(exch_code, item.composite_figi.as_deref())
            else {
                debug!("Could not map OpenFIGI exchange code {}", exch_code);
                continue;
            };
            let name = item.name.as_deref().unwrap_or_default();

            collector.offer(format!("{}:{}", symbol, code), symbol, name, Some(code), || {
                let listing = self.store.get(code);
                let suffix = listing
                    .as_ref()
                    .map(|exchange| exchange.suffix.as_str())
                    .unwrap_or_default();
                SymbolResult::new(
                    symbol,
                    name,
                    code,
                    normalize_security_type(item.security_type.as_deref().unwrap_or_default()),
                    suffix,
                )
                .with_country(
                    listing
                        .as_ref()
                        .map(|exchange| exchange.country.clone())
                        .unwrap_or_default(),
                )
                .with_currency(
                    item.currency
                        .as_deref()
                        .filter(|c| !c.is_empty())
                        .unwrap_or(DEFAULT_CURRENCY),
                )
            });
        }

        debug!("Found {} results for query: {}", collector.len(), query);
        collector.finish()
    }
}

#[async_trait]
impl ExchangeDataProvider for OpenFigiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            live_exchange_listing: false,
            supports_symbol_search: true,
            requires_api_key: false,
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
        let cache_key = symbol_search_cache_key(query, exchange, search_type);
        if let Some(cached) = self.cache.read::<Vec<SymbolResult>>(&cache_key, SYMBOL_SEARCH_TTL) {
            debug!("Using cached results for {}", query);
            return Ok(cached);
        }

        let listings = match self.search(query, exchange).await {
            Ok(listings) => listings,
            Err(e) => {
                warn!("Error searching symbols on {}: {}", PROVIDER_NAME, e);
                return Ok(Vec::new());
            }
        };

        let results = self.collect(listings, query, exchange, search_type);
        if !results.is_empty() {
            self.cache.write(&cache_key, &results);
        }
        Ok(results)
    }
}
