//! Exchange data provider abstractions and implementations.
//!
//! This module contains:
//! - The `ExchangeDataProvider` trait that all providers implement
//! - Provider capabilities
//! - Concrete provider implementations (Yahoo, Alpha Vantage, Marketstack,
//!   OpenFIGI, and the bundled-table provider)
//!
//! Providers never raise upstream failures to the caller: those are logged
//! and turned into empty results. Only configuration errors (such as a
//! missing API key) are returned.

mod capabilities;
mod http;
mod listing;
mod search;
mod traits;

pub mod alpha_vantage;
pub mod local;
pub mod marketstack;
pub mod openfigi;
pub mod yahoo;

// Re-exports
pub use alpha_vantage::AlphaVantageProvider;
pub use capabilities::ProviderCapabilities;
pub use local::LocalProvider;
pub use marketstack::MarketstackProvider;
pub use openfigi::OpenFigiProvider;
pub use traits::ExchangeDataProvider;
pub use yahoo::YahooProvider;
