//! A minimal TTL cache for derived statistics.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// A map whose entries expire `ttl` after they were written.
///
/// Expiry is lazy: `get` simply refuses to return a stale entry, nothing
/// sweeps in the background. The only bulk operation is `clear`. Writes
/// are last-writer-wins, which makes concurrent repopulation after a clear
/// harmless — at worst a fetch is wasted.
pub struct TimedCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V: Clone> TimedCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns a clone of the value under `key` if it is still fresh.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn set(&mut self, key: K, value: V) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drops every entry, fresh or stale; returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entries_are_returned() {
        let mut cache = TimedCache::new(Duration::from_secs(60));
        cache.set("hotels", 3);
        assert_eq!(cache.get(&"hotels"), Some(3));
        assert_eq!(cache.get(&"places"), None);
    }

    #[test]
    fn entries_expire_after_the_ttl() {
        let mut cache = TimedCache::new(Duration::ZERO);
        cache.set("hotels", 3);
        assert_eq!(cache.get(&"hotels"), None);
    }

    #[test]
    fn set_overwrites_and_refreshes() {
        let mut cache = TimedCache::new(Duration::from_secs(60));
        cache.set("hotels", 3);
        cache.set("hotels", 7);
        assert_eq!(cache.get(&"hotels"), Some(7));
    }

    #[test]
    fn clear_drops_everything_and_reports_the_count() {
        let mut cache = TimedCache::new(Duration::from_secs(60));
        cache.set("hotels", 1);
        cache.set("places", 2);
        assert_eq!(cache.clear(), 2);
        assert_eq!(cache.get(&"hotels"), None);
        assert_eq!(cache.clear(), 0);
    }
}
