use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::lookup::LookupKey;
use crate::models::SearchResult;

/// Freshness window for every strategy. Entries are expired lazily on the
/// lookup path; there is no background sweeper.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// What a source allows into the cache after a lookup.
///
/// The API path caches every outcome including failures, so a known-bad id
/// short-circuits before re-hitting the network. The scrape path only
/// caches non-empty successes: a browser render is expensive, but a
/// transient failure should be retried on the very next call. The two
/// policies reflect different cost/correctness tradeoffs and stay separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    Everything,
    NonEmptySuccess,
}

struct CacheEntry {
    value: SearchResult,
    expires_at: Instant,
}

/// In-memory result cache keyed by [`LookupKey`]. Values are cloned out so
/// callers can never corrupt a cached result. Concurrent misses on the
/// same key are not coalesced; the last put wins.
#[derive(Default)]
pub struct ResultCache {
    entries: RwLock<HashMap<LookupKey, CacheEntry>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh entry for `key`, removing it first if it has
    /// expired.
    pub fn get(&self, key: &LookupKey) -> Option<SearchResult> {
        let now = Instant::now();

        {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // stale: re-check under the write lock before removing, another
        // writer may have refreshed the entry in between
        let mut entries = self.entries.write().unwrap();
        if let Some(entry) = entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }
        None
    }

    pub fn put(&self, key: LookupKey, value: SearchResult) {
        self.put_with_ttl(key, value, CACHE_TTL);
    }

    pub fn put_with_ttl(&self, key: LookupKey, value: SearchResult, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().unwrap().insert(key, entry);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn result(query: &str) -> SearchResult {
        SearchResult::ok(query, Vec::new())
    }

    #[test]
    fn test_get_returns_fresh_entry() {
        let cache = ResultCache::new();
        let key = LookupKey::title("Inception");
        cache.put(key.clone(), result("Inception"));

        let hit = cache.get(&key).expect("entry should be fresh");
        assert_eq!(hit.query, "Inception");
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = ResultCache::new();
        let key = LookupKey::title("Inception");
        cache.put_with_ttl(key.clone(), result("Inception"), Duration::from_millis(30));

        assert!(cache.get(&key).is_some(), "still inside the ttl window");
        sleep(Duration::from_millis(60));
        assert!(cache.get(&key).is_none(), "past the ttl window");
    }

    #[test]
    fn test_expired_entry_is_removed_lazily() {
        let cache = ResultCache::new();
        let key = LookupKey::title("Arrival");
        cache.put_with_ttl(key.clone(), result("Arrival"), Duration::ZERO);
        assert_eq!(cache.len(), 1, "expiry never sweeps proactively");

        assert!(cache.get(&key).is_none());
        assert_eq!(cache.len(), 0, "stale entry removed on the lookup path");
    }

    #[test]
    fn test_put_overwrites_unconditionally() {
        let cache = ResultCache::new();
        let key = LookupKey::title("Dune");
        cache.put(key.clone(), SearchResult::failed("Dune", "api returned status 500"));
        cache.put(key.clone(), result("Dune"));

        let hit = cache.get(&key).unwrap();
        assert!(hit.success);
    }

    #[test]
    fn test_keys_are_variant_distinct() {
        let cache = ResultCache::new();
        cache.put(LookupKey::TmdbId("42".into()), result("42"));

        assert!(cache.get(&LookupKey::TvdbId("42".into())).is_none());
        assert!(cache.get(&LookupKey::title("42")).is_none());
        assert!(cache.get(&LookupKey::TmdbId("42".into())).is_some());
    }
}
