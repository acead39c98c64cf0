/// Normalize an upstream security type to the shared vocabulary
/// (`EQUITY`, `ETF`, `OPTION`, ...).
///
/// Unrecognized types are upper-cased and passed through.
pub fn normalize_security_type(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    if upper.contains("COMMON STOCK") || upper == "EQUITY" {
        "EQUITY".to_string()
    } else if upper.contains("OPTION") {
        "OPTION".to_string()
    } else if upper.contains("ETF") {
        "ETF".to_string()
    } else if upper == "MUTUAL FUND" {
        "MUTUALFUND".to_string()
    } else {
        upper
    }
}
