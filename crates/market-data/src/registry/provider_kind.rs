use std::fmt;
use std::sync::Arc;

use crate::errors::MarketDataError;
use crate::provider::{
    AlphaVantageProvider, ExchangeDataProvider, LocalProvider, MarketstackProvider,
    OpenFigiProvider, YahooProvider,
};

use super::ProviderContext;

/// Built-in provider variants.
///
/// This is the single list behind both [`ProviderFactory::create`] and
/// [`ProviderFactory::list_available`], so the two cannot drift apart.
///
/// [`ProviderFactory::create`]: super::ProviderFactory::create
/// [`ProviderFactory::list_available`]: super::ProviderFactory::list_available
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Yahoo,
    AlphaVantage,
    Marketstack,
    OpenFigi,
    Local,
}

impl ProviderKind {
    /// Every built-in variant, in listing order.
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::Yahoo,
        ProviderKind::AlphaVantage,
        ProviderKind::Marketstack,
        ProviderKind::OpenFigi,
        ProviderKind::Local,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::AlphaVantage => "alphavantage",
            Self::Marketstack => "marketstack",
            Self::OpenFigi => "openfigi",
            Self::Local => "local",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Yahoo => "Yahoo Finance",
            Self::AlphaVantage => "Alpha Vantage",
            Self::Marketstack => "Marketstack",
            Self::OpenFigi => "OpenFIGI",
            Self::Local => "Bundled Exchange Data",
        }
    }

    /// Parse a provider code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(code))
    }

    /// Construct the provider from the shared context.
    pub fn build(
        &self,
        context: &ProviderContext,
    ) -> Result<Arc<dyn ExchangeDataProvider>, MarketDataError> {
        let config = &context.config;
        let timeout = config.request_timeout;
        let provider: Arc<dyn ExchangeDataProvider> = match self {
            Self::Yahoo => Arc::new(YahooProvider::new(
                context.store.clone(),
                &context.cache,
                timeout,
            )),
            Self::AlphaVantage => Arc::new(AlphaVantageProvider::new(
                config.alpha_vantage_api_key.clone(),
                context.store.clone(),
                &context.cache,
                timeout,
            )),
            Self::Marketstack => Arc::new(MarketstackProvider::new(
                config.marketstack_api_key.clone(),
                &context.cache,
                timeout,
            )?),
            Self::OpenFigi => Arc::new(OpenFigiProvider::new(
                config.openfigi_api_key.clone(),
                context.store.clone(),
                &context.cache,
                timeout,
            )),
            Self::Local => Arc::new(LocalProvider::new(context.store.clone())),
        };
        Ok(provider)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
