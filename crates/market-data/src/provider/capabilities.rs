//! Provider capabilities.
//!
//! Capabilities let callers (and the factory listing) tell apart providers
//! that talk to a live upstream from the ones backed by the bundled
//! exchange table.

use serde::Serialize;

/// Describes what an exchange data provider can do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCapabilities {
    /// Whether exchanges are listed from the upstream API rather than the
    /// bundled exchange table.
    pub live_exchange_listing: bool,

    /// Whether `search_symbols` can return anything at all.
    pub supports_symbol_search: bool,

    /// Whether an API key is needed for the upstream calls.
    pub requires_api_key: bool,
}

impl ProviderCapabilities {
    /// Exchanges from the bundled table, no upstream calls.
    pub const fn bundled() -> Self {
        Self {
            live_exchange_listing: false,
            supports_symbol_search: false,
            requires_api_key: false,
        }
    }
}
