//! Yahoo Finance lookup API response models.

use serde::Deserialize;

/// Top-level `/v1/finance/lookup` response.
#[derive(Debug, Default, Deserialize)]
pub struct YahooLookupResponse {
    #[serde(default)]
    pub finance: Option<YahooLookupFinance>,
}

#[derive(Debug, Default, Deserialize)]
pub struct YahooLookupFinance {
    #[serde(default)]
    pub result: Vec<YahooLookupResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct YahooLookupResult {
    #[serde(default)]
    pub documents: Vec<YahooLookupDocument>,
}

/// One matched listing.
///
/// With `formatted=true` numeric fields come back as `{raw, fmt}` objects;
/// only the plain string fields are read here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooLookupDocument {
    pub symbol: Option<String>,
    pub short_name: Option<String>,
    pub quote_type: Option<String>,
    /// Yahoo exchange code (e.g., "ASX", "NMS")
    pub exchange: Option<String>,
}

impl YahooLookupResponse {
    /// Documents of the first result set, the only one Yahoo fills.
    pub fn into_documents(self) -> Vec<YahooLookupDocument> {
        self.finance
            .and_then(|finance| finance.result.into_iter().next())
            .map(|result| result.documents)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup_response() {
        let json = r#"{
            "finance": {
                "result": [{
                    "documents": [{
                        "symbol": "BHP.AX",
                        "shortName": "BHP GROUP FPO",
                        "quoteType": "equity",
                        "exchange": "ASX",
                        "regularMarketPrice": {"raw": 45.1, "fmt": "45.10"}
                    }]
                }],
                "error": null
            }
        }"#;
        let response: YahooLookupResponse = serde_json::from_str(json).unwrap();
        let documents = response.into_documents();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].symbol.as_deref(), Some("BHP.AX"));
        assert_eq!(documents[0].short_name.as_deref(), Some("BHP GROUP FPO"));
        assert_eq!(documents[0].exchange.as_deref(), Some("ASX"));
    }

    #[test]
    fn test_missing_sections_yield_no_documents() {
        let response: YahooLookupResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_documents().is_empty());

        let response: YahooLookupResponse =
            serde_json::from_str(r#"{"finance": {"result": []}}"#).unwrap();
        assert!(response.into_documents().is_empty());
    }
}
