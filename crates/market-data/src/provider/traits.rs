//! Exchange data provider trait definitions.
//!
//! This module defines the core `ExchangeDataProvider` trait that every
//! provider variant implements.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{ExchangeSummary, SearchType, SymbolResult};

use super::capabilities::ProviderCapabilities;

/// Trait for exchange data providers.
///
/// Implement this trait to add a new source of exchange listings and
/// symbol search. Register the implementation with
/// [`ProviderFactory::register`](crate::registry::ProviderFactory::register)
/// to make it available by name.
///
/// Only configuration problems are reported as errors. Upstream failures
/// are logged by the provider and surface as empty results.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tickerdex_market_data::models::ExchangeSummary;
/// use tickerdex_market_data::provider::{ExchangeDataProvider, ProviderCapabilities};
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl ExchangeDataProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "fixed"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities::bundled()
///     }
///
///     async fn get_all_exchanges(&self) -> Vec<ExchangeSummary> {
///         vec![ExchangeSummary::new("ASX", "Australian Securities Exchange", "Australia")]
///     }
///
///     async fn get_exchange(&self, code: &str) -> Option<ExchangeSummary> {
///         self.get_all_exchanges()
///             .await
///             .into_iter()
///             .find(|e| e.code.eq_ignore_ascii_case(code))
///     }
/// }
/// ```
#[async_trait]
pub trait ExchangeDataProvider: Send + Sync {
    /// Unique code for this provider, as accepted by the factory
    /// (e.g. "yahoo", "openfigi").
    fn id(&self) -> &'static str;

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Every exchange this provider knows about, sorted by country and
    /// then name.
    async fn get_all_exchanges(&self) -> Vec<ExchangeSummary>;

    /// Look up one exchange by code, ignoring case.
    async fn get_exchange(&self, code: &str) -> Option<ExchangeSummary>;

    /// Exchanges whose code, name, or country contains `query`, ignoring
    /// case. A blank query matches everything.
    async fn search_exchanges(&self, query: &str) -> Vec<ExchangeSummary> {
        self.get_all_exchanges()
            .await
            .into_iter()
            .filter(|exchange| exchange.matches(query))
            .collect()
    }

    /// Search tickers matching `query`, optionally restricted to one
    /// canonical exchange code.
    ///
    /// Default implementation returns no results.
    async fn search_symbols(
        &self,
        query: &str,
        exchange: Option<&str>,
        search_type: SearchType,
    ) -> Result<Vec<SymbolResult>, MarketDataError> {
        let _ = (query, exchange, search_type);
        Ok(Vec::new())
    }
}
