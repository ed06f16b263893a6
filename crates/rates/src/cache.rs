//! TTL cache of rate snapshots.
//!
//! Entries are keyed by (source selector, base currency) and checked for
//! age on read. Nothing is evicted proactively; an expired entry is simply
//! overwritten by the next successful lookup.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use log::debug;

use crate::models::{RateSnapshot, SourceSelector};

/// Default time-to-live for cached snapshots.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

type CacheKey = (SourceSelector, String);

#[derive(Clone)]
struct CacheEntry {
    snapshot: Arc<RateSnapshot>,
    inserted_at: Instant,
}

/// Concurrent snapshot cache. Concurrent writers race; the last one wins.
pub struct RateCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl RateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached snapshot if it is younger than the TTL.
    pub fn get(&self, selector: &SourceSelector, base: &str) -> Option<Arc<RateSnapshot>> {
        let key = (selector.clone(), base.to_string());
        let entry = self.entries.get(&key)?;

        if entry.inserted_at.elapsed() < self.ttl {
            debug!("Rate cache hit for {}:{}", selector, base);
            Some(Arc::clone(&entry.snapshot))
        } else {
            debug!("Rate cache entry for {}:{} expired", selector, base);
            None
        }
    }

    pub fn insert(&self, selector: &SourceSelector, base: &str, snapshot: Arc<RateSnapshot>) {
        self.entries.insert(
            (selector.clone(), base.to_string()),
            CacheEntry {
                snapshot,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RateSource, RateTable};

    fn snapshot(base: &str) -> Arc<RateSnapshot> {
        Arc::new(RateSnapshot::new(base, RateTable::new(), RateSource::Fallback))
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = RateCache::default();
        cache.insert(&SourceSelector::Auto, "USD", snapshot("USD"));

        let hit = cache.get(&SourceSelector::Auto, "USD").unwrap();
        assert_eq!(hit.base, "USD");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_include_selector() {
        let cache = RateCache::default();
        cache.insert(&SourceSelector::Auto, "USD", snapshot("USD"));

        assert!(cache.get(&SourceSelector::pinned("nbrb"), "USD").is_none());
        assert!(cache.get(&SourceSelector::Auto, "EUR").is_none());
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = RateCache::new(Duration::ZERO);
        cache.insert(&SourceSelector::Auto, "USD", snapshot("USD"));

        assert!(cache.get(&SourceSelector::Auto, "USD").is_none());
        // Expired entries are not evicted on read
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
