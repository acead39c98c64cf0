//! Property-based tests for exchange lookup, listing, and replacement.
//!
//! These tests verify that universal properties hold across generated
//! exchange tables, using the `proptest` crate.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use tickerdex_market_data::mapping::suffix_for;
use tickerdex_market_data::{Exchange, ExchangeDataProvider, ExchangeStore, LocalProvider, ResponseCache};

// =============================================================================
// Generators
// =============================================================================

/// Generates one exchange row with an upper-case code.
fn arb_exchange() -> impl Strategy<Value = Exchange> {
    (
        "[A-Z]{2,6}",      // code
        "[A-Za-z ]{3,30}", // name
        "[A-Za-z ]{3,20}", // country
        "X[A-Z]{3}",       // market_code
        "\\.[A-Z]{1,3}",   // suffix
    )
        .prop_map(|(code, name, country, market_code, suffix)| Exchange {
            code,
            name,
            country,
            market_code,
            suffix,
            status: "Active".to_string(),
        })
}

/// Generates a table without duplicate codes.
fn arb_exchanges(max_count: usize) -> impl Strategy<Value = Vec<Exchange>> {
    proptest::collection::vec(arb_exchange(), 0..=max_count).prop_map(|exchanges| {
        let mut seen = std::collections::HashSet::new();
        exchanges
            .into_iter()
            .filter(|exchange| seen.insert(exchange.code.clone()))
            .collect()
    })
}

fn sorted_by_code(mut exchanges: Vec<Exchange>) -> Vec<Exchange> {
    exchanges.sort_by(|a, b| a.code.cmp(&b.code));
    exchanges
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Lookup ignores the case of the code.
    #[test]
    fn prop_get_ignores_case(exchanges in arb_exchanges(20)) {
        let store = ExchangeStore::from_entries("unused.json", exchanges.clone());
        for exchange in &exchanges {
            let lower = store.get(&exchange.code.to_lowercase());
            let upper = store.get(&exchange.code.to_uppercase());
            prop_assert!(lower.is_some());
            prop_assert_eq!(lower, upper);
        }
    }

    /// Store-backed listings are sorted by (country, name).
    #[test]
    fn prop_all_exchanges_sorted(exchanges in arb_exchanges(20)) {
        let provider = LocalProvider::new(Arc::new(ExchangeStore::from_entries("unused.json", exchanges)));
        let listed = block_on(provider.get_all_exchanges());
        for pair in listed.windows(2) {
            let left = (&pair[0].country, &pair[0].name);
            let right = (&pair[1].country, &pair[1].name);
            prop_assert!(left <= right);
        }
    }

    /// Every search hit contains the query in its code, name, or country.
    #[test]
    fn prop_search_exchanges_is_sound(
        exchanges in arb_exchanges(20),
        query in "[A-Za-z]{0,3}",
    ) {
        let provider = LocalProvider::new(Arc::new(ExchangeStore::from_entries("unused.json", exchanges.clone())));
        let found = block_on(provider.search_exchanges(&query));
        let needle = query.to_lowercase();
        for exchange in &found {
            prop_assert!(
                exchange.code.to_lowercase().contains(&needle)
                    || exchange.name.to_lowercase().contains(&needle)
                    || exchange.country.to_lowercase().contains(&needle)
            );
        }
        if query.is_empty() {
            prop_assert_eq!(found.len(), exchanges.len());
        }
    }

    /// Replacing the table keeps exactly the valid entries, in memory and on
    /// disk.
    #[test]
    fn prop_replace_round_trip(
        exchanges in arb_exchanges(15),
        malformed_at in any::<prop::sample::Index>(),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exchanges.json");
        let store = ExchangeStore::from_entries(&path, Vec::new());

        let mut entries: Vec<Value> = exchanges
            .iter()
            .map(|exchange| serde_json::to_value(exchange).unwrap())
            .collect();
        let position = malformed_at.index(entries.len() + 1);
        entries.insert(position, json!({"code": "BAD", "name": "No Country"}));

        let accepted = store.replace(&entries).unwrap();
        prop_assert_eq!(accepted, exchanges.len());
        prop_assert_eq!(sorted_by_code(store.all()), sorted_by_code(exchanges.clone()));

        let reloaded = ExchangeStore::load(&path);
        prop_assert_eq!(sorted_by_code(reloaded.all()), sorted_by_code(exchanges));
    }

    /// A ticker on a NASDAQ venue gets `.NAS`; an already suffixed one gets
    /// nothing.
    #[test]
    fn prop_suffix_derivation(ticker in "[A-Z]{1,5}") {
        prop_assert_eq!(suffix_for(&ticker, "NMS", "NASDAQ Global Select"), ".NAS");
        let suffixed = format!("{}.AX", ticker);
        prop_assert_eq!(suffix_for(&suffixed, "ASX", "Australian Securities Exchange"), "");
    }

    /// A write is immediately readable for any positive TTL.
    #[test]
    fn prop_cache_write_then_read(
        key in "[a-z_]{1,20}",
        payload in proptest::collection::vec("[A-Z]{1,5}", 0..10),
        ttl_secs in 1u64..100_000,
    ) {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::init(dir.path()).unwrap().namespace("yahoo");
        cache.write(&key, &payload);
        let read: Option<Vec<String>> = cache.read(&key, Duration::from_secs(ttl_secs));
        prop_assert_eq!(read, Some(payload));
    }
}
