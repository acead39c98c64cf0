//! Marketstack MIC codes.
//!
//! Marketstack identifies venues by ISO 10383 MIC. Several MICs collapse into
//! one canonical exchange (the ASX family), so the reverse direction picks the
//! primary MIC.

/// Map a Marketstack MIC to the canonical exchange code.
///
/// Returns `None` for venues this system does not track.
pub fn mic_to_exchange(mic: &str) -> Option<&'static str> {
    match mic {
        // North America
        "XNAS" => Some("NASDAQ"),
        "XNYS" => Some("NYSE"),
        "XTSE" => Some("TSX"),

        // Australia
        "XASX" | "XASX.AX" => Some("ASX"),
        // Sydney Futures Exchange and Sydney Stock Exchange report under ASX
        "XSFE" | "XSYD" => Some("ASX"),
        "NSXA" => Some("NSX"),

        // Europe
        "XLON" => Some("LSE"),
        "XETR" => Some("FRA"),
        "XAMS" => Some("AMS"),
        "XPAR" => Some("PAR"),
        "XSWX" => Some("SWX"),

        // Asia
        "XHKG" => Some("HKEX"),
        "XJPX" => Some("TSE"),
        "XSES" => Some("SGX"),

        _ => None,
    }
}

/// Map a canonical exchange code to the Marketstack MIC used in requests.
pub fn exchange_to_mic(code: &str) -> Option<&'static str> {
    match code.to_uppercase().as_str() {
        "NASDAQ" => Some("XNAS"),
        "NYSE" => Some("XNYS"),
        "TSX" => Some("XTSE"),
        "ASX" => Some("XASX"),
        "NSX" => Some("NSXA"),
        "LSE" => Some("XLON"),
        "FRA" => Some("XETR"),
        "AMS" => Some("XAMS"),
        "PAR" => Some("XPAR"),
        "SWX" => Some("XSWX"),
        "HKEX" => Some("XHKG"),
        "TSE" => Some("XJPX"),
        "SGX" => Some("XSES"),
        _ => None,
    }
}

/// Ticker suffix appended to Marketstack results, or `""` when the
/// exchange has none.
pub fn exchange_suffix(code: &str) -> &'static str {
    match code {
        "ASX" => ".AX",
        "LSE" => ".L",
        "TSX" => ".TO",
        "HKEX" => ".HK",
        "NYSE" => ".NYS",
        "NASDAQ" => ".NAS",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mic_to_exchange() {
        assert_eq!(mic_to_exchange("XNAS"), Some("NASDAQ"));
        assert_eq!(mic_to_exchange("XASX"), Some("ASX"));
        assert_eq!(mic_to_exchange("XSFE"), Some("ASX"));
        assert_eq!(mic_to_exchange("XJPX"), Some("TSE"));
        assert_eq!(mic_to_exchange("XXXX"), None);
    }

    #[test]
    fn test_exchange_to_mic_round_trips_primary_mic() {
        for code in [
            "NASDAQ", "NYSE", "TSX", "ASX", "NSX", "LSE", "FRA", "AMS", "PAR", "SWX", "HKEX",
            "TSE", "SGX",
        ] {
            let mic = exchange_to_mic(code).unwrap();
            assert_eq!(mic_to_exchange(mic), Some(code));
        }
        assert_eq!(exchange_to_mic("asx"), Some("XASX"));
        assert_eq!(exchange_to_mic("BOGUS"), None);
    }

    #[test]
    fn test_exchange_suffix() {
        assert_eq!(exchange_suffix("ASX"), ".AX");
        assert_eq!(exchange_suffix("NASDAQ"), ".NAS");
        assert_eq!(exchange_suffix("PAR"), "");
    }
}
