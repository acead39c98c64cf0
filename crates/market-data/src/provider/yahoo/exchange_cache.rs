//! In-memory exchange list cache.
//!
//! Sits in front of the file cache so repeated listings within one process
//! do not touch the disk.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::ExchangeSummary;

/// Lifecycle of the cached list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExchangeListState {
    /// Nothing loaded yet.
    Empty,
    /// Loaded and younger than the TTL.
    Fresh,
    /// Loaded but past the TTL; the next read reloads it.
    Stale,
}

#[derive(Debug)]
struct CachedList {
    exchanges: Vec<ExchangeSummary>,
    fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ExchangeListCache {
    ttl: Duration,
    inner: RwLock<Option<CachedList>>,
}

impl ExchangeListCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(None),
        }
    }

    fn is_fresh(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => now.signed_duration_since(fetched_at) < ttl,
            Err(_) => true,
        }
    }

    pub async fn state_at(&self, now: DateTime<Utc>) -> ExchangeListState {
        match self.inner.read().await.as_ref() {
            None => ExchangeListState::Empty,
            Some(cached) if self.is_fresh(cached.fetched_at, now) => ExchangeListState::Fresh,
            Some(_) => ExchangeListState::Stale,
        }
    }

    /// The cached list, only while it is fresh at `now`.
    pub async fn fresh_at(&self, now: DateTime<Utc>) -> Option<Vec<ExchangeSummary>> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|cached| self.is_fresh(cached.fetched_at, now))
            .map(|cached| cached.exchanges.clone())
    }

    /// Replace the cached list; `fetched_at` is when the data was produced.
    pub async fn populate(&self, exchanges: Vec<ExchangeSummary>, fetched_at: DateTime<Utc>) {
        *self.inner.write().await = Some(CachedList {
            exchanges,
            fetched_at,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn asx() -> ExchangeSummary {
        ExchangeSummary::new("ASX", "Australian Securities Exchange", "Australia")
    }

    #[tokio::test]
    async fn test_state_transitions() {
        let cache = ExchangeListCache::new(DAY);
        let now = Utc::now();
        assert_eq!(cache.state_at(now).await, ExchangeListState::Empty);
        assert!(cache.fresh_at(now).await.is_none());

        cache.populate(vec![asx()], now).await;
        assert_eq!(cache.state_at(now).await, ExchangeListState::Fresh);
        assert_eq!(cache.fresh_at(now).await, Some(vec![asx()]));

        let later = now + chrono::Duration::hours(25);
        assert_eq!(cache.state_at(later).await, ExchangeListState::Stale);
        assert!(cache.fresh_at(later).await.is_none());
    }

    #[tokio::test]
    async fn test_populate_with_older_timestamp() {
        let cache = ExchangeListCache::new(DAY);
        let now = Utc::now();
        cache
            .populate(vec![asx()], now - chrono::Duration::hours(23))
            .await;
        assert_eq!(cache.state_at(now).await, ExchangeListState::Fresh);
        assert_eq!(
            cache.state_at(now + chrono::Duration::hours(2)).await,
            ExchangeListState::Stale
        );
    }
}
