//! Provider backed only by the bundled exchange table.
//!
//! Makes no network calls. Useful offline and as the baseline for the
//! exchange listing shared by the other store-backed providers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::ExchangeSummary;
use crate::provider::{listing, ExchangeDataProvider, ProviderCapabilities};
use crate::store::ExchangeStore;

const PROVIDER_ID: &str = "local";

pub struct LocalProvider {
    store: Arc<ExchangeStore>,
}

impl LocalProvider {
    pub fn new(store: Arc<ExchangeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ExchangeDataProvider for LocalProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::bundled()
    }

    async fn get_all_exchanges(&self) -> Vec<ExchangeSummary> {
        listing::store_exchanges(&self.store)
    }

    async fn get_exchange(&self, code: &str) -> Option<ExchangeSummary> {
        self.store.get(code).map(|exchange| exchange.summary())
    }
}
