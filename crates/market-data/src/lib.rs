//! Tickerdex Market Data Crate
//!
//! This crate provides exchange metadata and ticker symbol search over a
//! set of interchangeable market data providers.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Multiple providers: Yahoo Finance, Alpha Vantage, Marketstack, OpenFIGI,
//!   and a bundled exchange table that needs no network
//! - One normalized result shape for exchanges and symbols, whatever the
//!   upstream vocabulary
//! - Ticker suffix derivation (e.g. `BHP` on ASX becomes `BHP.AX`)
//! - A provider-scoped on-disk response cache with TTLs
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  ProviderConfig  | --> | ProviderFactory  |  (name -> provider)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                      +-----------------------+
//!                      | ExchangeDataProvider  |  (Yahoo, Marketstack, ...)
//!                      +-----------------------+
//!                        |         |         |
//!                        v         v         v
//!              ExchangeStore   mapping   ResponseCache
//!              (bundled data)  (codes,   (TTL, per-provider
//!                              suffixes)  namespaces)
//! ```
//!
//! # Core Types
//!
//! - [`ExchangeSummary`] - Exchange as returned to callers
//! - [`SymbolResult`] - Normalized symbol search hit
//! - [`SearchType`] - Match the query against the ticker or the name
//! - [`Exchange`] - Row of the bundled exchange table
//!
//! # Example
//!
//! ```ignore
//! use tickerdex_market_data::{ProviderConfig, ProviderFactory, SearchType};
//!
//! let factory = ProviderFactory::from_config(ProviderConfig::from_env())?;
//! let provider = factory.create("yahoo")?;
//! let hits = provider.search_symbols("BHP", Some("ASX"), SearchType::Symbol).await?;
//! ```

pub mod cache;
pub mod config;
pub mod errors;
pub mod mapping;
pub mod models;
pub mod provider;
pub mod registry;
pub mod store;

pub use config::ProviderConfig;
pub use errors::{MarketDataError, UpstreamFailure};

// Re-export all public types from models
pub use models::{Exchange, ExchangeSummary, ProviderCode, SearchType, SymbolResult};

// Re-export provider types
pub use provider::{
    AlphaVantageProvider, ExchangeDataProvider, LocalProvider, MarketstackProvider,
    OpenFigiProvider, ProviderCapabilities, YahooProvider,
};

// Re-export registry types
pub use registry::{
    ProviderConstructor, ProviderContext, ProviderDescriptor, ProviderFactory, ProviderKind,
};

pub use cache::ResponseCache;
pub use store::ExchangeStore;
