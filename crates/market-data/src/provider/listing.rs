//! Exchange listing helpers shared by the providers.

use crate::models::ExchangeSummary;
use crate::store::ExchangeStore;

/// Sort by country, then name.
pub(crate) fn sort_exchanges(exchanges: &mut [ExchangeSummary]) {
    exchanges.sort_by(|a, b| {
        a.country
            .cmp(&b.country)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Every exchange in the store as a sorted summary list.
pub(crate) fn store_exchanges(store: &ExchangeStore) -> Vec<ExchangeSummary> {
    let mut exchanges: Vec<ExchangeSummary> =
        store.all().iter().map(|exchange| exchange.summary()).collect();
    sort_exchanges(&mut exchanges);
    exchanges
}

/// Keep the first occurrence of each exchange code.
pub(crate) fn dedup_by_code(exchanges: Vec<ExchangeSummary>) -> Vec<ExchangeSummary> {
    let mut seen = std::collections::HashSet::new();
    exchanges
        .into_iter()
        .filter(|exchange| seen.insert(exchange.code.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_exchanges_by_country_then_name() {
        let mut exchanges = vec![
            ExchangeSummary::new("NYSE", "New York Stock Exchange", "United States"),
            ExchangeSummary::new("NSX", "National Stock Exchange of Australia", "Australia"),
            ExchangeSummary::new("ASX", "Australian Securities Exchange", "Australia"),
            ExchangeSummary::new("NASDAQ", "NASDAQ", "United States"),
        ];
        sort_exchanges(&mut exchanges);

        let codes: Vec<&str> = exchanges.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["ASX", "NSX", "NASDAQ", "NYSE"]);
    }

    #[test]
    fn test_dedup_by_code_keeps_first() {
        let exchanges = vec![
            ExchangeSummary::new("ASX", "Australian Securities Exchange", "Australia"),
            ExchangeSummary::new("ASX", "Sydney Futures Exchange", "Australia"),
        ];
        let deduped = dedup_by_code(exchanges);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].name, "Australian Securities Exchange");
    }
}
