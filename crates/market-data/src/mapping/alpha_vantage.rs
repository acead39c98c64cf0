//! Alpha Vantage regions.
//!
//! `SYMBOL_SEARCH` reports a `4. region` (a country or a market city) rather
//! than a venue. A region maps to one canonical exchange when it has a
//! primary venue. The United States has two primary venues and is left
//! unresolved.

/// Map an Alpha Vantage region to the canonical exchange code.
pub fn region_to_exchange(region: &str) -> Option<&'static str> {
    match region.trim() {
        "United Kingdom" | "London" => Some("LSE"),
        "Toronto" | "Canada" => Some("TSX"),
        "Frankfurt" | "XETRA" | "Germany" => Some("FRA"),
        "Amsterdam" | "Netherlands" => Some("AMS"),
        "Paris" | "France" => Some("PAR"),
        "Switzerland" => Some("SWX"),
        "Australia" => Some("ASX"),
        "Hong Kong" => Some("HKEX"),
        "Tokyo" | "Japan" => Some("TSE"),
        "Singapore" => Some("SGX"),
        "New Zealand" => Some("NZX"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_to_exchange() {
        assert_eq!(region_to_exchange("United Kingdom"), Some("LSE"));
        assert_eq!(region_to_exchange("XETRA"), Some("FRA"));
        assert_eq!(region_to_exchange("Frankfurt"), Some("FRA"));
        assert_eq!(region_to_exchange("Toronto"), Some("TSX"));
        assert_eq!(region_to_exchange("United States"), None);
        assert_eq!(region_to_exchange("Brazil/Sao Paolo"), None);
    }
}
