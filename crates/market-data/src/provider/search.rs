//! Symbol search pipeline shared by the live providers.
//!
//! Each provider maps its upstream rows to `SymbolResult`s; the
//! [`SymbolCollector`] applies the common rules in a fixed order:
//! duplicate check, search-type filter, exchange filter.

use std::collections::HashSet;

use crate::models::{SearchType, SymbolResult};

/// Cache key for one symbol search.
pub(crate) fn symbol_search_cache_key(
    query: &str,
    exchange: Option<&str>,
    search_type: SearchType,
) -> String {
    format!(
        "symbol_search_{}_{}_{}",
        query,
        exchange.unwrap_or("all"),
        search_type
    )
}

/// Trimmed, upper-cased exchange filter; blank means no filter.
pub(crate) fn normalize_exchange(exchange: Option<&str>) -> Option<String> {
    exchange
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_uppercase)
}

/// Accumulates symbol results for one search.
pub(crate) struct SymbolCollector<'a> {
    query: &'a str,
    exchange: Option<String>,
    search_type: SearchType,
    seen: HashSet<String>,
    results: Vec<SymbolResult>,
}

impl<'a> SymbolCollector<'a> {
    pub fn new(query: &'a str, exchange: Option<&str>, search_type: SearchType) -> Self {
        Self {
            query,
            exchange: normalize_exchange(exchange),
            search_type,
            seen: HashSet::new(),
            results: Vec::new(),
        }
    }

    /// Canonical exchange code the caller asked for, upper-cased.
    pub fn exchange_filter(&self) -> Option<&str> {
        self.exchange.as_deref()
    }

    /// Offer one candidate row.
    ///
    /// `dedup_key` identifies the listing (ticker, or ticker plus exchange
    /// for providers that return one row per venue). `exchange_code` is the
    /// resolved canonical code, if any. The result is only built once the
    /// row passes every check. Returns whether the row was kept.
    pub fn offer<F>(
        &mut self,
        dedup_key: String,
        ticker: &str,
        name: &str,
        exchange_code: Option<&str>,
        build: F,
    ) -> bool
    where
        F: FnOnce() -> SymbolResult,
    {
        if self.seen.contains(&dedup_key) {
            return false;
        }
        if !self.search_type.matches(self.query, ticker, name) {
            return false;
        }
        if let Some(filter) = &self.exchange {
            match exchange_code {
                Some(code) if code.eq_ignore_ascii_case(filter) => {}
                _ => return false,
            }
        }

        self.seen.insert(dedup_key);
        self.results.push(build());
        true
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn finish(self) -> Vec<SymbolResult> {
        self.results
    }
}
