//! Marketstack exchange data provider.
//!
//! Lists exchanges live from the paginated `/exchanges` endpoint and searches
//! tickers through `/tickerslist`. Venues are identified by MIC upstream and
//! mapped to canonical codes with [`crate::mapping::marketstack`]; venues
//! outside that table are skipped.
//!
//! The free plan does not allow HTTPS, hence the plain-HTTP base URL.

mod models;

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;

use crate::cache::{CacheNamespace, ResponseCache, EXCHANGE_LIST_TTL, SYMBOL_SEARCH_TTL};
use crate::config::MARKETSTACK_API_KEY;
use crate::errors::MarketDataError;
use crate::mapping::marketstack::{exchange_suffix, exchange_to_mic, mic_to_exchange};
use crate::models::{ExchangeSummary, SearchType, SymbolResult};
use crate::provider::search::{normalize_exchange, symbol_search_cache_key, SymbolCollector};
use crate::provider::{http, listing, ExchangeDataProvider, ProviderCapabilities};

use models::{ExchangesPage, MarketstackExchange, TickersPage};

const BASE_URL: &str = "http://api.marketstack.com/v2";
const PROVIDER_ID: &str = "marketstack";
const PROVIDER_NAME: &str = "Marketstack";
const EXCHANGES_CACHE_KEY: &str = "exchanges";
const EXCHANGE_PAGE_LIMIT: u64 = 3000;
const SEARCH_LIMIT: &str = "50";
const DEFAULT_CURRENCY: &str = "USD";

/// Marketstack provider.
pub struct MarketstackProvider {
    client: Client,
    base_url: String,
    api_key: String,
    cache: CacheNamespace,
}

impl MarketstackProvider {
    /// Create a new Marketstack provider.
    ///
    /// Fails with [`MarketDataError::MissingApiKey`] when no key is given.
    pub fn new(
        api_key: Option<String>,
        cache: &ResponseCache,
        timeout: Duration,
    ) -> Result<Self, MarketDataError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| MarketDataError::MissingApiKey {
                provider: PROVIDER_NAME.to_string(),
                env_var: MARKETSTACK_API_KEY.to_string(),
            })?;

        Ok(Self {
            client: http::build_client(timeout),
            base_url: BASE_URL.to_string(),
            api_key,
            cache: cache.namespace(PROVIDER_ID),
        })
    }

    /// Point the provider at another API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// GET `{base_url}/{endpoint}` with the access key appended.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("access_key", self.api_key.as_str()));

        let endpoint_url = format!("{}/{}", self.base_url, endpoint);
        let url = reqwest::Url::parse_with_params(&endpoint_url, &all_params).map_err(|e| {
            MarketDataError::provider(PROVIDER_NAME, format!("Failed to build URL: {}", e))
        })?;

        debug!(
            "Marketstack request: {}",
            http::mask(url.as_str(), Some(self.api_key.as_str()))
        );

        http::send(PROVIDER_NAME, self.client.get(url)).await
    }

    // ========================================================================
    // Exchanges
    // ========================================================================

    /// Walk every `/exchanges` page. Any failed page fails the whole listing.
    ///
    /// Progress is counted locally: the walk stops once the rows received
    /// reach the reported total, the upstream marks the last page, or a page
    /// brings no venue not already seen.
    async fn fetch_exchanges(&self) -> Result<Vec<ExchangeSummary>, MarketDataError> {
        let mut exchanges = Vec::new();
        let mut seen = HashSet::new();
        let mut offset: u64 = 0;
        let mut received: u64 = 0;
        let limit = EXCHANGE_PAGE_LIMIT.to_string();

        loop {
            let offset_param = offset.to_string();
            let text = self
                .fetch(
                    "exchanges",
                    &[("limit", limit.as_str()), ("offset", offset_param.as_str())],
                )
                .await?;
            let page: ExchangesPage = http::parse(PROVIDER_NAME, &text)?;
            if page.data.is_empty() {
                break;
            }

            received = received.saturating_add(page.data.len() as u64);
            let mut fresh = false;
            for exchange in &page.data {
                fresh |= seen.insert(exchange.identity());
            }
            if !fresh {
                warn!("Marketstack repeated an exchange page at offset {}", offset);
                break;
            }

            exchanges.extend(page.data.iter().filter_map(to_summary));

            match &page.pagination {
                Some(pagination) if !pagination.is_complete(received) => {
                    offset = offset.saturating_add(EXCHANGE_PAGE_LIMIT);
                }
                _ => break,
            }
        }

        let mut exchanges = listing::dedup_by_code(exchanges);
        listing::sort_exchanges(&mut exchanges);
        Ok(exchanges)
    }

    // ========================================================================
    // Symbol search
    // ========================================================================

    async fn fetch_tickers(
        &self,
        query: &str,
        exchange: Option<&str>,
    ) -> Result<TickersPage, MarketDataError> {
        let mut params = vec![("search", query), ("limit", SEARCH_LIMIT)];
        if let Some(mic) = normalize_exchange(exchange).and_then(|code| exchange_to_mic(&code)) {
            params.push(("exchanges", mic));
        }
        let text = self.fetch("tickerslist", &params).await?;
        http::parse(PROVIDER_NAME, &text)
    }

    fn collect(
        page: TickersPage,
        query: &str,
        exchange: Option<&str>,
        search_type: SearchType,
    ) -> Vec<SymbolResult> {
        let mut collector = SymbolCollector::new(query, exchange, search_type);

        for ticker in page.data {
            let Some(symbol) = ticker.ticker.as_deref().filter(|t| !t.is_empty()) else {
                continue;
            };
            let name = ticker.name.as_deref().unwrap_or_default();
            let venue = ticker.stock_exchange.unwrap_or_default();
            let code = venue.mic.as_deref().and_then(mic_to_exchange);

            let dedup_key = format!("{}_{}", symbol, code.unwrap_or_default());
            collector.offer(dedup_key, symbol, name, code, || {
                SymbolResult::new(
                    symbol,
                    name,
                    venue.name.clone().unwrap_or_default(),
                    "EQUITY",
                    code.map(exchange_suffix).unwrap_or_default(),
                )
                .with_country(venue.country.clone().unwrap_or_default())
                .with_currency(
                    venue
                        .currency
                        .clone()
                        .filter(|c| !c.is_empty())
                        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                )
            });
        }

        debug!("Found {} results", collector.len());
        collector.finish()
    }
}

/// Map a listed exchange to a summary, skipping unmapped MICs.
fn to_summary(exchange: &MarketstackExchange) -> Option<ExchangeSummary> {
    let mic = exchange.mic.as_deref().unwrap_or_default();
    let Some(code) = mic_to_exchange(mic) else {
        debug!("No mapping found for exchange MIC: {}", mic);
        return None;
    };
    Some(
        ExchangeSummary::new(
            code,
            exchange.name.clone().unwrap_or_default(),
            exchange.country.clone().unwrap_or_default(),
        )
        .with_timezone(exchange.timezone_name()),
    )
}

#[async_trait]
impl ExchangeDataProvider for MarketstackProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            live_exchange_listing: true,
            supports_symbol_search: true,
            requires_api_key: true,
        }
    }

    async fn get_all_exchanges(&self) -> Vec<ExchangeSummary> {
        if let Some(cached) = self
            .cache
            .read::<Vec<ExchangeSummary>>(EXCHANGES_CACHE_KEY, EXCHANGE_LIST_TTL)
        {
            info!("Using cached exchange list");
            return cached;
        }

        match self.fetch_exchanges().await {
            Ok(exchanges) => {
                if !exchanges.is_empty() {
                    self.cache.write(EXCHANGES_CACHE_KEY, &exchanges);
                }
                info!("Found {} mapped exchanges", exchanges.len());
                exchanges
            }
            Err(e) => {
                warn!("Error fetching exchanges from {}: {}", PROVIDER_NAME, e);
                Vec::new()
            }
        }
    }

    async fn get_exchange(&self, code: &str) -> Option<ExchangeSummary> {
        let mic = exchange_to_mic(code)?;
        let text = match self.fetch(&format!("exchanges/{}", mic), &[]).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Error getting exchange {} from {}: {}", code, PROVIDER_NAME, e);
                return None;
            }
        };
        let exchange: MarketstackExchange = match http::parse(PROVIDER_NAME, &text) {
            Ok(exchange) => exchange,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };

        let name = exchange.name.clone().filter(|name| !name.is_empty())?;
        Some(
            ExchangeSummary::new(
                code.trim().to_uppercase(),
                name,
                exchange.country.clone().unwrap_or_default(),
            )
            .with_timezone(exchange.timezone_name()),
        )
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

        let page = match self.fetch_tickers(query, exchange).await {
            Ok(page) => page,
            Err(e) => {
                warn!("{} search error: {}", PROVIDER_NAME, e);
                return Ok(Vec::new());
            }
        };

        let results = Self::collect(page, query, exchange, search_type);
        if !results.is_empty() {
            self.cache.write(&cache_key, &results);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache(dir: &TempDir) -> ResponseCache {
        ResponseCache::init(dir.path()).unwrap()
    }

    #[test]
    fn test_new_requires_api_key() {
        let dir = TempDir::new().unwrap();
        let result = MarketstackProvider::new(None, &cache(&dir), Duration::from_secs(5));
        match result {
            Err(error @ MarketDataError::MissingApiKey { .. }) => {
                assert!(error.to_string().contains("MARKETSTACK_API_KEY"));
            }
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("provider created without key"),
        }

        let blank = MarketstackProvider::new(Some("  ".into()), &cache(&dir), Duration::from_secs(5));
        assert!(blank.is_err());
    }

    #[test]
    fn test_to_summary_maps_mic() {
        let exchange: MarketstackExchange = serde_json::from_str(
            r#"{"name": "Australian Securities Exchange", "mic": "XASX", "country": "Australia",
                "timezone": {"timezone": "Australia/Sydney"}}"#,
        )
        .unwrap();
        let summary = to_summary(&exchange).unwrap();
        assert_eq!(summary.code, "ASX");
        assert_eq!(summary.timezone.as_deref(), Some("Australia/Sydney"));

        let unmapped: MarketstackExchange =
            serde_json::from_str(r#"{"name": "Nowhere", "mic": "XNOW"}"#).unwrap();
        assert!(to_summary(&unmapped).is_none());
    }

    #[test]
    fn test_collect_dedups_by_ticker_and_exchange() {
        let page: TickersPage = serde_json::from_str(
            r#"{"data": [
                {"ticker": "BHP", "name": "BHP Group", "stock_exchange":
                    {"name": "Australian Securities Exchange", "mic": "XASX", "country": "Australia", "currency": "AUD"}},
                {"ticker": "BHP", "name": "BHP Group", "stock_exchange":
                    {"name": "Australian Securities Exchange", "mic": "XASX", "country": "Australia", "currency": "AUD"}},
                {"ticker": "BHP", "name": "BHP Group", "stock_exchange":
                    {"name": "New York Stock Exchange", "mic": "XNYS", "country": "USA"}}
            ]}"#,
        )
        .unwrap();

        let results = MarketstackProvider::collect(page, "BHP", None, SearchType::Symbol);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].result, "BHP.AX");
        assert_eq!(results[0].currency.as_deref(), Some("AUD"));
        assert_eq!(results[0].security_type, "EQUITY");
        assert_eq!(results[1].result, "BHP.NYS");
        assert_eq!(results[1].currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_collect_filters_by_exchange() {
        let page: TickersPage = serde_json::from_str(
            r#"{"data": [
                {"ticker": "BHP", "name": "BHP Group", "stock_exchange": {"mic": "XNYS"}},
                {"ticker": "BHP", "name": "BHP Group", "stock_exchange": {"mic": "XASX"}},
                {"ticker": "BHPX", "name": "BHP Other", "stock_exchange": {"mic": "XXXX"}}
            ]}"#,
        )
        .unwrap();

        let results = MarketstackProvider::collect(page, "BHP", Some("ASX"), SearchType::Symbol);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].result, "BHP.AX");
    }
}
