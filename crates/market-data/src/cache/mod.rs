//! On-disk response cache.
//!
//! Provider responses are persisted as JSON envelopes under one directory.
//! Each provider works through its own [`CacheNamespace`], so identical
//! logical keys from different providers never collide.
//!
//! There is no eviction: stale entries are ignored on read and overwritten
//! by the next write for the same key.

mod response_cache;

pub use response_cache::{CacheEntry, CacheNamespace, ResponseCache};

use std::time::Duration;

/// TTL for exchange listings.
pub const EXCHANGE_LIST_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// TTL for symbol search results.
pub const SYMBOL_SEARCH_TTL: Duration = Duration::from_secs(60 * 60);
