//! Yahoo Finance exchange data provider.
//!
//! Exchanges come from the bundled [`ExchangeStore`]; symbol search goes to
//! the Yahoo Finance lookup API. Yahoo tags documents with its own venue
//! codes, which are mapped to canonical codes before the store lookup. Yahoo
//! does not return ticker suffixes for every venue, so one is derived from
//! the matched exchange.

mod exchange_cache;
mod models;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::cache::{CacheNamespace, ResponseCache, EXCHANGE_LIST_TTL, SYMBOL_SEARCH_TTL};
use crate::errors::MarketDataError;
use crate::mapping::yahoo::yahoo_exchange_to_exchange;
use crate::mapping::{normalize_security_type, suffix_for};
use crate::models::Exchange;
use crate::models::{ExchangeSummary, SearchType, SymbolResult};
use crate::provider::search::{symbol_search_cache_key, SymbolCollector};
use crate::provider::{http, listing, ExchangeDataProvider, ProviderCapabilities};
use crate::store::ExchangeStore;

pub use exchange_cache::{ExchangeListCache, ExchangeListState};
use models::{YahooLookupDocument, YahooLookupResponse};

const PROVIDER_ID: &str = "yahoo";
const PROVIDER_NAME: &str = "Yahoo Finance";
const BASE_URL: &str = "https://query2.finance.yahoo.com";
const LOOKUP_PATH: &str = "/v1/finance/lookup";
const LOOKUP_TYPES: &str = "equity,etf";
const LOOKUP_COUNT: &str = "50";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const EXCHANGES_CACHE_KEY: &str = "exchanges";

/// Yahoo Finance provider.
pub struct YahooProvider {
    client: Client,
    base_url: String,
    store: Arc<ExchangeStore>,
    cache: CacheNamespace,
    exchange_list: ExchangeListCache,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new(store: Arc<ExchangeStore>, cache: &ResponseCache, timeout: Duration) -> Self {
        Self {
            client: http::build_client(timeout),
            base_url: BASE_URL.to_string(),
            store,
            cache: cache.namespace(PROVIDER_ID),
            exchange_list: ExchangeListCache::new(EXCHANGE_LIST_TTL),
        }
    }

    /// Point the provider at another host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Current state of the in-memory exchange list.
    pub async fn exchange_list_state(&self) -> ExchangeListState {
        self.exchange_list.state_at(Utc::now()).await
    }

    // ========================================================================
    // Exchange listing
    // ========================================================================

    /// Memory first, then the file cache, then the store.
    async fn load_exchanges(&self) -> Vec<ExchangeSummary> {
        let now = Utc::now();
        if let Some(exchanges) = self.exchange_list.fresh_at(now).await {
            debug!("Using in-memory exchange list ({} entries)", exchanges.len());
            return exchanges;
        }

        if let Some(entry) = self.cache.read_entry(EXCHANGES_CACHE_KEY, EXCHANGE_LIST_TTL) {
            match serde_json::from_value::<Vec<ExchangeSummary>>(entry.payload) {
                Ok(exchanges) => {
                    self.exchange_list
                        .populate(exchanges.clone(), entry.written_at)
                        .await;
                    return exchanges;
                }
                Err(e) => warn!("Ignoring unreadable cached exchange list: {}", e),
            }
        }

        let exchanges = listing::store_exchanges(&self.store);
        if !exchanges.is_empty() {
            self.exchange_list.populate(exchanges.clone(), now).await;
            self.cache.write(EXCHANGES_CACHE_KEY, &exchanges);
        }
        exchanges
    }

    // ========================================================================
    // Symbol lookup
    // ========================================================================

    async fn lookup(&self, query: &str) -> Result<Vec<YahooLookupDocument>, MarketDataError> {
        let url = format!("{}{}", self.base_url, LOOKUP_PATH);
        debug!("Looking up '{}' on {}", query, PROVIDER_NAME);

        let request = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .query(&[
                ("query", query),
                ("type", LOOKUP_TYPES),
                ("count", LOOKUP_COUNT),
                ("formatted", "true"),
            ]);
        let body = http::send(PROVIDER_NAME, request).await?;
        let response: YahooLookupResponse = http::parse(PROVIDER_NAME, &body)?;
        Ok(response.into_documents())
    }

    /// Resolve a Yahoo venue code to a store exchange, falling back to the
    /// raw code for venues Yahoo already names canonically.
    fn resolve_exchange(&self, raw: &str) -> Option<Exchange> {
        if raw.is_empty() {
            return None;
        }
        yahoo_exchange_to_exchange(raw)
            .and_then(|code| self.store.get(code))
            .or_else(|| self.store.get(raw))
    }

    fn collect(
        &self,
        documents: Vec<YahooLookupDocument>,
        query: &str,
        exchange: Option<&str>,
        search_type: SearchType,
    ) -> Vec<SymbolResult> {
        let mut collector = SymbolCollector::new(query, exchange, search_type);

        for document in documents {
            let quote_type = document.quote_type.as_deref().unwrap_or_default();
            if !is_supported_quote_type(quote_type) {
                continue;
            }
            let (Some(symbol), Some(name)) =
                (document.symbol.as_deref(), document.short_name.as_deref())
            else {
                continue;
            };
            if symbol.is_empty() || name.is_empty() {
                continue;
            }

            let raw_exchange = document.exchange.as_deref().unwrap_or_default();
            let listing = self.resolve_exchange(raw_exchange);
            let code = listing.as_ref().map(|exchange| exchange.code.as_str());

            collector.offer(symbol.to_string(), symbol, name, code, || {
                let (display, suffix) = match &listing {
                    Some(exchange) => (
                        exchange.name.as_str(),
                        suffix_for(symbol, &exchange.code, &exchange.name),
                    ),
                    None => (raw_exchange, ""),
                };
                SymbolResult::new(
                    symbol,
                    name,
                    display,
                    normalize_security_type(quote_type),
                    suffix,
                )
            });
        }

        debug!("Found {} results", collector.len());
        collector.finish()
    }
}

fn is_supported_quote_type(quote_type: &str) -> bool {
    quote_type.eq_ignore_ascii_case("equity") || quote_type.eq_ignore_ascii_case("etf")
}

#[async_trait]
impl ExchangeDataProvider for YahooProvider {
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
        self.load_exchanges().await
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
            return Ok(cached);
        }

        let documents = match self.lookup(query).await {
            Ok(documents) => documents,
            Err(e) => {
                warn!("{} search error: {}", PROVIDER_NAME, e);
                return Ok(Vec::new());
            }
        };

        let results = self.collect(documents, query, exchange, search_type);
        if !results.is_empty() {
            self.cache.write(&cache_key, &results);
        }
        Ok(results)
    }
}
