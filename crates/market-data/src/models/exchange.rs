//! Exchange models.

use serde::{Deserialize, Serialize};

/// A row of the bundled exchange reference table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// Canonical exchange code (e.g., "ASX", "NYSE")
    pub code: String,
    pub name: String,
    pub country: String,
    /// Market code used by upstream feeds (e.g., "XASX")
    pub market_code: String,
    /// Ticker suffix for listings on this exchange (e.g., ".AX")
    pub suffix: String,
    #[serde(default)]
    pub status: String,
}

impl Exchange {
    /// Summary shape handed to callers.
    pub fn summary(&self) -> ExchangeSummary {
        ExchangeSummary::new(&self.code, &self.name, &self.country)
    }
}

/// Exchange as returned by the provider operations.
///
/// Wire shape: `{code, name, country}` plus `timezone` when the upstream
/// source knows it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeSummary {
    pub code: String,
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl ExchangeSummary {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            country: country.into(),
            timezone: None,
        }
    }

    /// Set the timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        let timezone = timezone.into();
        self.timezone = (!timezone.is_empty()).then_some(timezone);
        self
    }

    /// Case-insensitive substring match on code, name, or country.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_uppercase();
        self.code.to_uppercase().contains(&query)
            || self.name.to_uppercase().contains(&query)
            || self.country.to_uppercase().contains(&query)
    }
}
