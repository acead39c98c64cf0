//! Search result models for symbol lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What the search query is matched against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Query must be a substring of the ticker.
    #[default]
    Symbol,
    /// Query must be a substring of the company name.
    Company,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Company => "company",
        }
    }

    /// Case-insensitive match of `query` against the ticker or the name.
    pub fn matches(&self, query: &str, ticker: &str, name: &str) -> bool {
        let query = query.to_uppercase();
        match self {
            Self::Symbol => ticker.to_uppercase().contains(&query),
            Self::Company => name.to_uppercase().contains(&query),
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symbol" => Ok(Self::Symbol),
            "company" => Ok(Self::Company),
            other => Err(format!(
                "Invalid search type '{}'. Must be either \"symbol\" or \"company\"",
                other
            )),
        }
    }
}

/// Normalized result from a ticker/symbol search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolResult {
    /// Ticker as reported upstream (e.g., "BHP", "VOD")
    pub symbol: String,

    /// Company or fund name
    pub description: String,

    pub display_symbol: String,

    /// Exchange display name, or canonical exchange code
    pub exchange: String,

    /// Normalized security type (e.g., "EQUITY", "ETF")
    #[serde(rename = "type")]
    pub security_type: String,

    /// Symbol with the derived exchange suffix (e.g., "BHP.AX")
    pub result: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl SymbolResult {
    /// Create a new result; `result` is `symbol` followed by `suffix`.
    pub fn new(
        symbol: impl Into<String>,
        description: impl Into<String>,
        exchange: impl Into<String>,
        security_type: impl Into<String>,
        suffix: &str,
    ) -> Self {
        let symbol = symbol.into();
        Self {
            display_symbol: symbol.clone(),
            result: format!("{}{}", symbol, suffix),
            symbol,
            description: description.into(),
            exchange: exchange.into(),
            security_type: security_type.into(),
            country: None,
            currency: None,
        }
    }

    /// Set the country.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Set the currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_type_parse() {
        assert_eq!("symbol".parse::<SearchType>(), Ok(SearchType::Symbol));
        assert_eq!("company".parse::<SearchType>(), Ok(SearchType::Company));
        assert!("ticker".parse::<SearchType>().is_err());
        assert_eq!(SearchType::default(), SearchType::Symbol);
    }

    #[test]
    fn test_search_type_matches() {
        assert!(SearchType::Symbol.matches("bh", "BHP", "BHP Group"));
        assert!(!SearchType::Symbol.matches("group", "BHP", "BHP Group"));
        assert!(SearchType::Company.matches("group", "BHP", "BHP Group"));
        assert!(!SearchType::Company.matches("xyz", "BHP", "BHP Group"));
    }

    #[test]
    fn test_symbol_result_wire_shape() {
        let result = SymbolResult::new("BHP", "BHP Group", "ASX", "EQUITY", ".AX")
            .with_country("Australia")
            .with_currency("AUD");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "symbol": "BHP",
                "description": "BHP Group",
                "displaySymbol": "BHP",
                "exchange": "ASX",
                "type": "EQUITY",
                "result": "BHP.AX",
                "country": "Australia",
                "currency": "AUD"
            })
        );
    }

    #[test]
    fn test_symbol_result_omits_optional_fields() {
        let result = SymbolResult::new("AAPL", "Apple Inc", "NASDAQ", "EQUITY", "");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("country").is_none());
        assert!(json.get("currency").is_none());
        assert_eq!(json["result"], "AAPL");
    }
}
