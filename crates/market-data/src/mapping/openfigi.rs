//! OpenFIGI exchange codes.
//!
//! OpenFIGI tags listings with a two-letter `exchCode` that is sometimes a
//! country (`AU`, `US`) and sometimes a Bloomberg venue code (`LN`, `UW`).
//! Both spellings are accepted when mapping back to canonical codes.

/// Map an OpenFIGI `exchCode` to the canonical exchange code.
///
/// When the code is unknown, a US-family or blank code falls back to the
/// composite FIGI prefix (`UA` -> NASDAQ, `BB` -> NYSE).
pub fn figi_exchange_to_exchange(
    exch_code: &str,
    composite_figi: Option<&str>,
) -> Option<&'static str> {
    let direct = match exch_code {
        "AU" => Some("ASX"),
        "GB" | "LN" => Some("LSE"),
        "CA" | "CN" => Some("TSX"),
        "HK" => Some("HKEX"),
        "DE" | "GR" => Some("FRA"),
        "NL" | "NA" => Some("AMS"),
        "FR" | "FP" => Some("PAR"),
        "CH" | "SW" => Some("SWX"),
        "JP" | "JT" => Some("TSE"),
        "SG" | "SP" => Some("SGX"),
        "UA" | "UW" | "UQ" | "UR" => Some("NASDAQ"),
        "US" | "UN" => Some("NYSE"),
        _ => None,
    };
    if direct.is_some() {
        return direct;
    }

    if !(exch_code.is_empty() || exch_code.starts_with('U')) {
        return None;
    }

    let prefix = composite_figi?.get(..2)?.to_uppercase();
    match prefix.as_str() {
        "UA" => Some("NASDAQ"),
        "BB" => Some("NYSE"),
        _ => None,
    }
}

/// Map a canonical exchange code to the `exchCode` sent with a search.
///
/// NYSE and NASDAQ share the `US` code upstream, so they return `None`
/// and the caller filters by resolved exchange after the fetch instead.
pub fn exchange_to_figi_exchange(code: &str) -> Option<&'static str> {
    match code.to_uppercase().as_str() {
        "ASX" => Some("AU"),
        "LSE" => Some("GB"),
        "TSX" => Some("CA"),
        "HKEX" => Some("HK"),
        "FRA" => Some("DE"),
        "AMS" => Some("NL"),
        "PAR" => Some("FR"),
        "SWX" => Some("CH"),
        "TSE" => Some("JP"),
        "SGX" => Some("SG"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_mapping() {
        assert_eq!(figi_exchange_to_exchange("AU", None), Some("ASX"));
        assert_eq!(figi_exchange_to_exchange("LN", None), Some("LSE"));
        assert_eq!(figi_exchange_to_exchange("UW", None), Some("NASDAQ"));
        assert_eq!(figi_exchange_to_exchange("US", None), Some("NYSE"));
    }

    #[test]
    fn test_composite_figi_fallback() {
        assert_eq!(
            figi_exchange_to_exchange("UV", Some("UA1234567890")),
            Some("NASDAQ")
        );
        assert_eq!(
            figi_exchange_to_exchange("", Some("BBG000B9XRY4")),
            Some("NYSE")
        );
        assert_eq!(figi_exchange_to_exchange("UV", Some("ZZ0000")), None);
        assert_eq!(figi_exchange_to_exchange("UV", None), None);
    }

    #[test]
    fn test_fallback_skipped_for_foreign_codes() {
        assert_eq!(figi_exchange_to_exchange("BZ", Some("BBG000BZ0000")), None);
    }

    #[test]
    fn test_exchange_to_figi_exchange() {
        assert_eq!(exchange_to_figi_exchange("ASX"), Some("AU"));
        assert_eq!(exchange_to_figi_exchange("lse"), Some("GB"));
        assert_eq!(exchange_to_figi_exchange("NYSE"), None);
        assert_eq!(exchange_to_figi_exchange("NASDAQ"), None);

        for code in ["ASX", "LSE", "TSX", "HKEX", "FRA", "AMS", "PAR", "SWX", "TSE", "SGX"] {
            let exch_code = exchange_to_figi_exchange(code).unwrap();
            assert_eq!(figi_exchange_to_exchange(exch_code, None), Some(code));
        }
    }
}
