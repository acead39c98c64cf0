//! Provider registry module.
//!
//! This module turns provider names into provider instances:
//! - [`ProviderKind`]: the built-in variants and their display names
//! - [`ProviderContext`]: the shared dependencies every constructor receives
//! - [`ProviderFactory`]: lookup by name, listing, and registration of
//!   additional providers

mod factory;
mod provider_kind;

pub use factory::{ProviderConstructor, ProviderContext, ProviderDescriptor, ProviderFactory};
pub use provider_kind::ProviderKind;
