//! Error types and upstream failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`UpstreamFailure`]: Classification of failed upstream HTTP calls

mod upstream;

pub use upstream::UpstreamFailure;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Only configuration problems and factory lookups reach callers of the
/// provider methods. Everything upstream-related is recovered inside the
/// provider and logged; see [`is_configuration`](Self::is_configuration).
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// No provider is registered under the requested name.
    #[error("Unknown provider type: {0}")]
    UnknownProvider(String),

    /// A provider that needs an API key was used without one.
    #[error("{provider} API key not configured. Please set the {env_var} environment variable.")]
    MissingApiKey {
        /// The provider that needs the key
        provider: String,
        /// Environment variable the key is read from
        env_var: String,
    },

    /// The response cache directory could not be created.
    #[error("Failed to initialise cache directory {}: {source}", .path.display())]
    CacheInit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The exchange data file could not be rewritten.
    #[error("Failed to persist exchange data to {}: {source}", .path.display())]
    StorePersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The upstream API answered with a classified HTTP failure.
    #[error("Upstream error: {provider} - {}", .failure.describe())]
    Upstream {
        provider: String,
        failure: UpstreamFailure,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarketDataError {
    /// Build a [`MarketDataError::ProviderError`].
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error reflects caller or deployment misconfiguration.
    ///
    /// Configuration errors are raised to the caller; every other kind is
    /// degraded to an empty result by the providers.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownProvider(_) | Self::MissingApiKey { .. } | Self::CacheInit { .. }
        )
    }
}
