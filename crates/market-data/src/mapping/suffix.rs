//! Heuristic ticker suffixes for providers that only report an exchange
//! name (Yahoo lookup, Alpha Vantage).

/// Suffixes that mark a ticker as already venue-qualified.
pub const KNOWN_SUFFIXES: &[&str] = &[
    ".AX", ".XA", ".NAS", ".NYS", ".PK", ".EX", ".QX", ".QB", ".OB",
];

/// Whether `symbol` already ends in one of [`KNOWN_SUFFIXES`].
pub fn has_known_suffix(symbol: &str) -> bool {
    let symbol = symbol.to_uppercase();
    KNOWN_SUFFIXES.iter().any(|suffix| symbol.ends_with(suffix))
}

/// Derive a suffix from a canonical exchange code and its display name.
///
/// Rules are checked in order; the first hit wins. Returns `""` when nothing
/// matches.
pub fn heuristic_suffix(code: &str, name: &str) -> &'static str {
    let code = code.to_uppercase();
    let name = name.to_uppercase();

    // ASX and CHESS Depositary Interests share .AX
    if code == "ASX" || code == "CXA" {
        ".AX"
    } else if name.contains("NASDAQ") {
        ".NAS"
    } else if name.contains("NYSE") {
        ".NYS"
    } else if name.contains("OTC PINK") || code == "PNK" {
        ".PK"
    } else if name.contains("OTC EXPERT") || code == "OEM" {
        ".EX"
    } else if name.contains("OTCQX") || code == "QX" {
        ".QX"
    } else if name.contains("OTCQB") || code == "QB" {
        ".QB"
    } else if name.contains("BULLETIN BOARD") || code == "OBB" {
        ".OB"
    } else {
        ""
    }
}

/// Suffix to append to `symbol`, or `""` when it already carries one.
pub fn suffix_for(symbol: &str, code: &str, name: &str) -> &'static str {
    if has_known_suffix(symbol) {
        ""
    } else {
        heuristic_suffix(code, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_known_suffix() {
        assert!(has_known_suffix("BHP.AX"));
        assert!(has_known_suffix("aapl.nas"));
        assert!(!has_known_suffix("AAPL"));
        assert!(!has_known_suffix("BRK.B"));
    }

    #[test]
    fn test_heuristic_suffix_by_name() {
        assert_eq!(heuristic_suffix("NAS", "NASDAQ Stock Market"), ".NAS");
        assert_eq!(heuristic_suffix("NYQ", "New York Stock Exchange (NYSE)"), ".NYS");
        assert_eq!(heuristic_suffix("X", "OTCQB Venture Market"), ".QB");
        assert_eq!(heuristic_suffix("X", "OTC Bulletin Board"), ".OB");
        assert_eq!(heuristic_suffix("LSE", "London Stock Exchange"), "");
    }

    #[test]
    fn test_heuristic_suffix_by_code() {
        assert_eq!(heuristic_suffix("asx", "Australian Securities Exchange"), ".AX");
        assert_eq!(heuristic_suffix("CXA", "Cboe Australia"), ".AX");
        assert_eq!(heuristic_suffix("PNK", "Pink Sheets"), ".PK");
        assert_eq!(heuristic_suffix("OEM", "Expert Market"), ".EX");
    }

    #[test]
    fn test_suffix_for_skips_suffixed_tickers() {
        assert_eq!(suffix_for("AAPL", "NAS", "NASDAQ Stock Market"), ".NAS");
        assert_eq!(suffix_for("BHP.AX", "ASX", "Australian Securities Exchange"), "");
    }
}
