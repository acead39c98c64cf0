//! Yahoo Finance exchange codes.
//!
//! The lookup API tags each document with Yahoo's own venue code (`NMS`,
//! `NYQ`, `TOR`, ...). Several codes collapse into one canonical exchange:
//! the NASDAQ tiers, and the NYSE family (Arca and American report as NYSE).

/// Map a Yahoo `exchange` value to the canonical exchange code.
///
/// Returns `None` for venues this system does not track.
pub fn yahoo_exchange_to_exchange(code: &str) -> Option<&'static str> {
    match code.trim().to_uppercase().as_str() {
        // North America
        "NMS" | "NGM" | "NCM" | "NAS" => Some("NASDAQ"),
        "NYQ" | "NYS" | "ASE" | "PCX" => Some("NYSE"),
        "PNK" | "OQB" | "OQX" => Some("PNK"),
        "TOR" => Some("TSX"),

        // Australia and New Zealand
        "ASX" => Some("ASX"),
        "CXA" => Some("CXA"),
        "NZE" => Some("NZX"),

        // Europe
        "LSE" | "IOB" => Some("LSE"),
        "GER" | "FRA" => Some("FRA"),
        "AMS" => Some("AMS"),
        "PAR" => Some("PAR"),
        "EBS" => Some("SWX"),

        // Asia
        "HKG" => Some("HKEX"),
        "JPX" => Some("TSE"),
        "SES" => Some("SGX"),

        _ => None,
    }
}
