//! Provider factory.
//!
//! Resolves provider names to instances. Built-in providers come from
//! [`ProviderKind`]; embedders can add their own with
//! [`ProviderFactory::register`].

use std::borrow::Cow;
use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use super::ProviderKind;
use crate::cache::ResponseCache;
use crate::config::ProviderConfig;
use crate::errors::MarketDataError;
use crate::models::ProviderCode;
use crate::provider::ExchangeDataProvider;
use crate::store::ExchangeStore;

/// Shared dependencies handed to every provider constructor.
#[derive(Clone, Debug)]
pub struct ProviderContext {
    pub config: Arc<ProviderConfig>,
    pub store: Arc<ExchangeStore>,
    pub cache: ResponseCache,
}

impl ProviderContext {
    pub fn new(config: ProviderConfig, store: Arc<ExchangeStore>, cache: ResponseCache) -> Self {
        Self {
            config: Arc::new(config),
            store,
            cache,
        }
    }

    /// Load the exchange store and initialise the cache directory named by
    /// `config`.
    pub fn from_config(config: ProviderConfig) -> Result<Self, MarketDataError> {
        let cache = ResponseCache::init(&config.cache_dir)?;
        let store = Arc::new(ExchangeStore::load(&config.exchanges_file));
        Ok(Self::new(config, store, cache))
    }
}

/// Builds a registered provider from the shared context.
pub type ProviderConstructor = Arc<
    dyn Fn(&ProviderContext) -> Result<Arc<dyn ExchangeDataProvider>, MarketDataError>
        + Send
        + Sync,
>;

/// Entry of [`ProviderFactory::list_available`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderDescriptor {
    pub code: ProviderCode,
    pub name: Cow<'static, str>,
}

struct RegisteredProvider {
    descriptor: ProviderDescriptor,
    constructor: ProviderConstructor,
}

/// Creates providers by name.
pub struct ProviderFactory {
    context: ProviderContext,
    registered: Vec<RegisteredProvider>,
}

impl ProviderFactory {
    pub fn new(context: ProviderContext) -> Self {
        Self {
            context,
            registered: Vec::new(),
        }
    }

    /// Factory over a context built with [`ProviderContext::from_config`].
    pub fn from_config(config: ProviderConfig) -> Result<Self, MarketDataError> {
        Ok(Self::new(ProviderContext::from_config(config)?))
    }

    pub fn context(&self) -> &ProviderContext {
        &self.context
    }

    /// The exchange store shared by every provider this factory creates.
    pub fn store(&self) -> &Arc<ExchangeStore> {
        &self.context.store
    }

    fn find_registered(&self, code: &str) -> Option<&RegisteredProvider> {
        self.registered
            .iter()
            .find(|entry| entry.descriptor.code.eq_ignore_ascii_case(code))
    }

    /// Create the provider registered under `name`, ignoring case and
    /// surrounding whitespace.
    ///
    /// Registered providers take precedence over built-ins with the same
    /// code.
    pub fn create(&self, name: &str) -> Result<Arc<dyn ExchangeDataProvider>, MarketDataError> {
        let code = name.trim().to_lowercase();

        if let Some(entry) = self.find_registered(&code) {
            debug!("Creating registered provider {}", entry.descriptor.code);
            return (entry.constructor)(&self.context);
        }

        let kind = ProviderKind::from_code(&code)
            .ok_or_else(|| MarketDataError::UnknownProvider(name.to_string()))?;
        let provider = kind.build(&self.context)?;
        info!("Created {} provider", kind.display_name());
        Ok(provider)
    }

    /// Create the provider named by `default_provider` in the config.
    pub fn create_default(&self) -> Result<Arc<dyn ExchangeDataProvider>, MarketDataError> {
        self.create(&self.context.config.default_provider)
    }

    /// Every provider `create` accepts: built-ins first, then registered
    /// providers in registration order.
    pub fn list_available(&self) -> Vec<ProviderDescriptor> {
        let builtins = ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.find_registered(kind.code()).is_none())
            .map(|kind| ProviderDescriptor {
                code: Cow::Borrowed(kind.code()),
                name: Cow::Borrowed(kind.display_name()),
            });

        builtins
            .chain(self.registered.iter().map(|entry| entry.descriptor.clone()))
            .collect()
    }

    /// Register an additional provider under `code`.
    ///
    /// Registering a code again replaces the earlier constructor but keeps
    /// its position in [`list_available`](Self::list_available).
    pub fn register<F>(&mut self, code: &str, display_name: &str, constructor: F)
    where
        F: Fn(&ProviderContext) -> Result<Arc<dyn ExchangeDataProvider>, MarketDataError>
            + Send
            + Sync
            + 'static,
    {
        let descriptor = ProviderDescriptor {
            code: Cow::Owned(code.trim().to_lowercase()),
            name: Cow::Owned(display_name.to_string()),
        };
        let constructor: ProviderConstructor = Arc::new(constructor);

        match self
            .registered
            .iter_mut()
            .find(|entry| entry.descriptor.code == descriptor.code)
        {
            Some(entry) => {
                entry.descriptor = descriptor;
                entry.constructor = constructor;
            }
            None => {
                info!("Registered provider {}", descriptor.code);
                self.registered.push(RegisteredProvider {
                    descriptor,
                    constructor,
                });
            }
        }
    }
}
