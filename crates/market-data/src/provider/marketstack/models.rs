//! Marketstack v2 response models.

use serde::Deserialize;
use serde_json::Value;

/// Paginated `/exchanges` response.
#[derive(Debug, Default, Deserialize)]
pub struct ExchangesPage {
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub data: Vec<MarketstackExchange>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub total: u64,
}

impl Pagination {
    /// Whether this page reaches the end of the listing.
    pub fn is_last_page(&self) -> bool {
        self.offset.saturating_add(self.count) >= self.total
    }

    /// Whether the listing is done after `received` rows in total.
    pub fn is_complete(&self, received: u64) -> bool {
        received >= self.total || self.is_last_page()
    }
}

/// One exchange, as listed by `/exchanges` and returned by
/// `/exchanges/{mic}`.
#[derive(Debug, Default, Deserialize)]
pub struct MarketstackExchange {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mic: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Either `{"timezone": "...", "abbr": ...}` or a bare string.
    #[serde(default)]
    pub timezone: Option<Value>,
}

impl MarketstackExchange {
    /// Key identifying a venue across pages.
    pub fn identity(&self) -> (Option<String>, Option<String>) {
        (self.mic.clone(), self.name.clone())
    }

    pub fn timezone_name(&self) -> String {
        match &self.timezone {
            Some(Value::String(timezone)) => timezone.clone(),
            Some(Value::Object(object)) => object
                .get("timezone")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        }
    }
}

/// `/tickerslist` response.
#[derive(Debug, Default, Deserialize)]
pub struct TickersPage {
    #[serde(default)]
    pub data: Vec<MarketstackTicker>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketstackTicker {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stock_exchange: Option<TickerExchange>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TickerExchange {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mic: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}
