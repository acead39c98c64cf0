use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::Exchange;

/// Fields an entry must carry to be accepted by [`ExchangeStore::replace`].
const REQUIRED_FIELDS: [&str; 5] = ["code", "name", "country", "market_code", "suffix"];

#[derive(Debug, Deserialize)]
struct ExchangeFile {
    exchanges: Vec<Exchange>,
}

#[derive(Serialize)]
struct ExchangeFileRef<'a> {
    exchanges: &'a [Exchange],
}

/// Immutable snapshot of the reference table.
#[derive(Debug, Default)]
struct ExchangeTable {
    /// Dataset order
    ordered: Vec<Exchange>,
    /// Upper-cased code -> position in `ordered`
    index: HashMap<String, usize>,
}

impl ExchangeTable {
    fn build(entries: Vec<Exchange>) -> Self {
        let mut table = Self::default();
        for mut exchange in entries {
            exchange.code = exchange.code.to_uppercase();
            match table.index.get(&exchange.code) {
                // Later duplicates replace earlier ones in place.
                Some(&position) => table.ordered[position] = exchange,
                None => {
                    table.index.insert(exchange.code.clone(), table.ordered.len());
                    table.ordered.push(exchange);
                }
            }
        }
        table
    }

    fn get(&self, code: &str) -> Option<&Exchange> {
        self.index
            .get(&code.to_uppercase())
            .map(|&position| &self.ordered[position])
    }
}

/// Exchange reference table keyed by canonical code.
///
/// Lookups are case-insensitive. The table is replaced wholesale by
/// [`replace`](Self::replace), so readers observe either the old or the new
/// table, never a mix.
#[derive(Debug)]
pub struct ExchangeStore {
    path: PathBuf,
    table: RwLock<Arc<ExchangeTable>>,
}

impl ExchangeStore {
    /// Load the store from a `{"exchanges": [...]}` document.
    ///
    /// A missing or malformed file yields an empty store; the problem is
    /// logged and never returned.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_dataset(&path) {
            Ok(Some(entries)) => {
                info!(
                    "Loaded {} exchanges from {}",
                    entries.len(),
                    path.display()
                );
                entries
            }
            Ok(None) => {
                warn!("Exchange data file not found at: {}", path.display());
                Vec::new()
            }
            Err(e) => {
                warn!("Error loading exchanges from {}: {}", path.display(), e);
                Vec::new()
            }
        };
        Self::from_entries(path, entries)
    }

    /// Build a store from in-memory entries. `path` is where
    /// [`replace`](Self::replace) persists to.
    pub fn from_entries(path: impl Into<PathBuf>, entries: Vec<Exchange>) -> Self {
        Self {
            path: path.into(),
            table: RwLock::new(Arc::new(ExchangeTable::build(entries))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn snapshot(&self) -> Arc<ExchangeTable> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look up an exchange by code, ignoring case.
    pub fn get(&self, code: &str) -> Option<Exchange> {
        self.snapshot().get(code).cloned()
    }

    /// Every exchange, in dataset order.
    pub fn all(&self) -> Vec<Exchange> {
        self.snapshot().ordered.clone()
    }

    /// Exchanges whose country equals `country`, ignoring case.
    pub fn by_country(&self, country: &str) -> Vec<Exchange> {
        let country = country.to_lowercase();
        self.snapshot()
            .ordered
            .iter()
            .filter(|exchange| exchange.country.to_lowercase() == country)
            .cloned()
            .collect()
    }

    /// Ticker suffix for an exchange code.
    pub fn suffix(&self, code: &str) -> Option<String> {
        self.snapshot()
            .get(code)
            .map(|exchange| exchange.suffix.clone())
    }

    pub fn len(&self) -> usize {
        self.snapshot().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the whole table and rewrite the backing file.
    ///
    /// Entries missing any of `code`, `name`, `country`, `market_code`,
    /// `suffix` are dropped. The in-memory swap always happens; a failed
    /// write is logged and returned, leaving memory and disk out of step
    /// until the next successful replace.
    ///
    /// Returns the number of accepted entries.
    pub fn replace(&self, entries: &[Value]) -> Result<usize, MarketDataError> {
        let validated: Vec<Exchange> = entries.iter().filter_map(validate_entry).collect();
        let dropped = entries.len() - validated.len();
        if dropped > 0 {
            warn!("Dropped {} malformed exchange entries", dropped);
        }

        let table = Arc::new(ExchangeTable::build(validated));
        let accepted = table.ordered.len();
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = table.clone();

        persist(&self.path, &table.ordered).map_err(|source| {
            error!(
                "Error updating exchange data at {}: {}",
                self.path.display(),
                source
            );
            MarketDataError::StorePersist {
                path: self.path.clone(),
                source,
            }
        })?;

        info!("Replaced exchange data with {} entries", accepted);
        Ok(accepted)
    }
}

fn read_dataset(path: &Path) -> Result<Option<Vec<Exchange>>, MarketDataError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    let file: ExchangeFile = serde_json::from_str(&raw)?;
    Ok(Some(file.exchanges))
}

fn validate_entry(entry: &Value) -> Option<Exchange> {
    let object = entry.as_object()?;
    let field = |name: &str| object.get(name).and_then(Value::as_str).map(str::to_string);

    if REQUIRED_FIELDS.iter().any(|name| field(name).is_none()) {
        return None;
    }

    Some(Exchange {
        code: field("code")?,
        name: field("name")?,
        country: field("country")?,
        market_code: field("market_code")?,
        suffix: field("suffix")?,
        status: field("status").unwrap_or_default(),
    })
}

fn persist(path: &Path, exchanges: &[Exchange]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&ExchangeFileRef { exchanges })
        .map_err(std::io::Error::other)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}
