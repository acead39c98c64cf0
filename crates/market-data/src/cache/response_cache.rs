use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::MarketDataError;

/// Envelope stored for every cached payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Namespaced key (`<prefix>:<key>`)
    pub key: String,
    pub payload: Value,
    pub written_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry is older than `max_age` at `now`.
    pub fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.written_at);
        match chrono::Duration::from_std(max_age) {
            Ok(max_age) => age > max_age,
            Err(_) => false,
        }
    }
}

/// Root of the on-disk cache.
#[derive(Clone, Debug)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Create the cache directory if needed.
    pub fn init(dir: impl Into<PathBuf>) -> Result<Self, MarketDataError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| MarketDataError::CacheInit {
            path: dir.clone(),
            source,
        })?;
        debug!("Response cache ready at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache view scoped to one provider.
    pub fn namespace(&self, prefix: &str) -> CacheNamespace {
        CacheNamespace {
            dir: self.dir.clone(),
            prefix: prefix.to_string(),
        }
    }
}

/// Provider-scoped view of the [`ResponseCache`].
///
/// Reads never fail: a missing, unreadable, expired, or foreign entry is
/// simply absent. Writes are best effort and only logged on failure.
#[derive(Clone, Debug)]
pub struct CacheNamespace {
    dir: PathBuf,
    prefix: String,
}

impl CacheNamespace {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    fn entry_path(&self, scoped_key: &str) -> PathBuf {
        let digest = md5::compute(scoped_key.as_bytes());
        self.dir.join(format!("{}_{:x}.json", self.prefix, digest))
    }

    /// Cached payload for `key` if it is at most `max_age` old.
    pub fn read_value(&self, key: &str, max_age: Duration) -> Option<Value> {
        self.read_entry(key, max_age).map(|entry| entry.payload)
    }

    /// Like [`read_value`](Self::read_value) but keeps the envelope, so
    /// callers can see when the payload was written.
    pub fn read_entry(&self, key: &str, max_age: Duration) -> Option<CacheEntry> {
        let scoped_key = self.scoped_key(key);
        let path = self.entry_path(&scoped_key);
        if !path.exists() {
            return None;
        }

        let entry: CacheEntry = match fs::read_to_string(&path)
            .map_err(MarketDataError::from)
            .and_then(|raw| serde_json::from_str(&raw).map_err(MarketDataError::from))
        {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error reading cache {}: {}", scoped_key, e);
                return None;
            }
        };

        if entry.key != scoped_key {
            debug!("Cache key mismatch for {}", scoped_key);
            return None;
        }
        if entry.is_expired(max_age, Utc::now()) {
            debug!("Cache entry {} is stale", scoped_key);
            return None;
        }

        debug!("Cache hit for {}", scoped_key);
        Some(entry)
    }

    /// Typed variant of [`read_value`](Self::read_value).
    pub fn read<T: DeserializeOwned>(&self, key: &str, max_age: Duration) -> Option<T> {
        let value = self.read_value(key, max_age)?;
        match serde_json::from_value(value) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!("Error decoding cache {}: {}", self.scoped_key(key), e);
                None
            }
        }
    }

    /// Persist `payload` under `key`, replacing any previous entry.
    pub fn write_value(&self, key: &str, payload: Value) {
        let scoped_key = self.scoped_key(key);
        let path = self.entry_path(&scoped_key);
        let entry = CacheEntry {
            key: scoped_key.clone(),
            payload,
            written_at: Utc::now(),
        };
        if let Err(e) = write_entry(&path, &entry) {
            warn!("Error writing cache {}: {}", scoped_key, e);
        }
    }

    /// Typed variant of [`write_value`](Self::write_value).
    pub fn write<T: Serialize>(&self, key: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.write_value(key, value),
            Err(e) => warn!("Error encoding cache {}: {}", self.scoped_key(key), e),
        }
    }
}

fn write_entry(path: &Path, entry: &CacheEntry) -> Result<(), MarketDataError> {
    let json = serde_json::to_string(entry)?;
    // Write-then-rename so readers never see a truncated file.
    let tmp = path.with_extension(format!("{}.tmp", std::process::id()));
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_init_creates_directory() {
        let dir = TempDir::new().unwrap();
        let cache_dir = dir.path().join("nested").join("cache");
        let cache = ResponseCache::init(&cache_dir).unwrap();
        assert!(cache.dir().is_dir());
    }

    #[test]
    fn test_init_reports_failure() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("occupied");
        fs::write(&file, "x").unwrap();
        let result = ResponseCache::init(&file);
        assert!(matches!(result, Err(MarketDataError::CacheInit { .. })));
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::init(dir.path()).unwrap().namespace("marketstack");

        cache.write_value("exchanges", json!([{"code": "ASX"}]));
        assert_eq!(
            cache.read_value("exchanges", HOUR),
            Some(json!([{"code": "ASX"}]))
        );
    }

    #[test]
    fn test_missing_key_is_absent() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::init(dir.path()).unwrap().namespace("openfigi");
        assert_eq!(cache.read_value("nothing", HOUR), None);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let dir = TempDir::new().unwrap();
        let root = ResponseCache::init(dir.path()).unwrap();
        let a = root.namespace("marketstack");
        let b = root.namespace("openfigi");

        a.write_value("symbol_search_BHP_all", json!(["BHP"]));
        assert_eq!(b.read_value("symbol_search_BHP_all", HOUR), None);
        assert!(a.read_value("symbol_search_BHP_all", HOUR).is_some());
    }

    #[test]
    fn test_stale_entry_is_absent() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::init(dir.path()).unwrap().namespace("yahoo");
        let scoped = cache.scoped_key("exchanges");
        let entry = CacheEntry {
            key: scoped.clone(),
            payload: json!([]),
            written_at: Utc::now() - chrono::Duration::hours(2),
        };
        write_entry(&cache.entry_path(&scoped), &entry).unwrap();

        assert_eq!(cache.read_value("exchanges", HOUR), None);
        assert_eq!(cache.read_value("exchanges", 3 * HOUR), Some(json!([])));
    }

    #[test]
    fn test_corrupt_entry_is_absent() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::init(dir.path()).unwrap().namespace("yahoo");
        let path = cache.entry_path(&cache.scoped_key("exchanges"));
        fs::write(path, "{ truncated").unwrap();
        assert_eq!(cache.read_value("exchanges", HOUR), None);
    }

    #[test]
    fn test_typed_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::init(dir.path()).unwrap().namespace("yahoo");
        cache.write("codes", &vec!["ASX".to_string(), "LSE".to_string()]);
        let codes: Option<Vec<String>> = cache.read("codes", HOUR);
        assert_eq!(codes, Some(vec!["ASX".to_string(), "LSE".to_string()]));

        let wrong: Option<Vec<u32>> = cache.read("codes", HOUR);
        assert_eq!(wrong, None);
    }

    #[test]
    fn test_later_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::init(dir.path()).unwrap().namespace("yahoo");
        cache.write_value("k", json!(1));
        cache.write_value("k", json!(2));
        assert_eq!(cache.read_value("k", HOUR), Some(json!(2)));
    }
}
