//! Exchange reference data.
//!
//! The [`ExchangeStore`] is the single source of truth for "known exchanges".
//! It is loaded from a bundled JSON document and shared by every provider
//! that does not list exchanges from its own upstream API.

mod exchange_store;

pub use exchange_store::ExchangeStore;
