//! # Tile Cache
//!
//! A bounded LRU cache for WMTS tiles.
//!
//! Map viewers ask for the same tiles over and over while panning; keeping
//! the most recent ones in memory saves a round trip and a bit of quota.
//!
//! Recency is tracked with a logical clock (a counter bumped on every
//! access) rather than wall time, so eviction order is reproducible in
//! tests.

use crate::endpoints::{DEFAULT_EPSG, TileCoord};
use std::collections::BTreeMap;

/// Default number of tiles kept in memory.
pub const DEFAULT_TILE_CACHE_SIZE: usize = 256;

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    stamp: u64,
}

/// Least-recently-used cache with a fixed entry capacity.
#[derive(Debug)]
pub struct LruCache<K: Ord + Clone, V> {
    slots: BTreeMap<K, Slot<V>>,
    /// stamp -> key, oldest first.
    recency: BTreeMap<u64, K>,
    capacity: usize,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl<K: Ord + Clone, V> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: BTreeMap::new(),
            recency: BTreeMap::new(),
            capacity: capacity.max(1),
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock = self.clock.saturating_add(1);
        self.clock
    }

    /// Look up `key`, marking it as most recently used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let stamp = self.tick();
        match self.slots.get_mut(key) {
            Some(slot) => {
                self.recency.remove(&slot.stamp);
                self.recency.insert(stamp, key.clone());
                slot.stamp = stamp;
                self.hits = self.hits.saturating_add(1);
                Some(&slot.value)
            }
            None => {
                self.misses = self.misses.saturating_add(1);
                None
            }
        }
    }

    /// Look up `key` without touching recency or statistics.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    /// Insert or replace `key`, evicting the least recently used entry when
    /// the cache is full.
    pub fn insert(&mut self, key: K, value: V) {
        let stamp = self.tick();

        if let Some(old) = self.slots.remove(&key) {
            self.recency.remove(&old.stamp);
        } else if self.slots.len() >= self.capacity {
            self.evict_oldest();
        }

        self.recency.insert(stamp, key.clone());
        self.slots.insert(key, Slot { value, stamp });
    }

    fn evict_oldest(&mut self) {
        if let Some((_, key)) = self.recency.pop_first() {
            self.slots.remove(&key);
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.slots.remove(key)?;
        self.recency.remove(&slot.stamp);
        Some(slot.value)
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.recency.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let total = self.hits.saturating_add(self.misses);
        let hit_rate_percent = if total == 0 {
            0
        } else {
            (self.hits.saturating_mul(100) / total) as u8
        };
        CacheStats {
            size: self.slots.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            hit_rate_percent,
        }
    }
}

/// Cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    /// 0-100, rounded down.
    pub hit_rate_percent: u8,
}

/// Identity of one WMTS tile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey {
    pub item_id: String,
    pub epsg: u32,
    pub tile: TileCoord,
}

impl TileKey {
    /// Key for a web mercator tile.
    #[must_use]
    pub fn new(item_id: impl Into<String>, tile: TileCoord) -> Self {
        Self {
            item_id: item_id.into(),
            epsg: DEFAULT_EPSG,
            tile,
        }
    }

    #[must_use]
    pub const fn with_epsg(mut self, epsg: u32) -> Self {
        self.epsg = epsg;
        self
    }
}

/// Encoded tile images by tile identity.
pub type TileCache = LruCache<TileKey, Vec<u8>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut cache = LruCache::new(4);
        cache.insert(1u32, "a");
        cache.insert(2u32, "b");
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&3), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = LruCache::new(3);
        cache.insert(1u32, "a");
        cache.insert(2u32, "b");
        cache.insert(3u32, "c");

        // 1 becomes the most recent, 2 is now the oldest
        let _ = cache.get(&1);
        cache.insert(4u32, "d");

        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
        assert!(cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn replacing_does_not_evict() {
        let mut cache = LruCache::new(2);
        cache.insert(1u32, "old");
        cache.insert(2u32, "b");
        cache.insert(1u32, "new");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.peek(&1), Some(&"new"));
        assert!(cache.contains(&2));
    }

    #[test]
    fn capacity_is_at_least_one() {
        let mut cache = LruCache::new(0);
        cache.insert(1u32, ());
        cache.insert(2u32, ());
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&2));
        assert_eq!(cache.stats().capacity, 1);
    }

    #[test]
    fn stats_count_hits_and_misses() {
        let mut cache = LruCache::new(8);
        cache.insert(1u32, 'x');
        let _ = cache.get(&1);
        let _ = cache.get(&2);
        let _ = cache.get(&1);
        let _ = cache.peek(&9);

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate_percent, 66);
    }

    #[test]
    fn remove_and_clear() {
        let mut cache = LruCache::new(8);
        cache.insert(1u32, 10);
        cache.insert(2u32, 20);
        assert_eq!(cache.remove(&1), Some(10));
        assert_eq!(cache.remove(&1), None);

        cache.clear();
        assert!(cache.is_empty());

        cache.insert(3u32, 30);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn tile_keys_differ_by_projection() {
        let mut cache: TileCache = LruCache::new(4);
        let tile = TileCoord::new(16, 24070, 35699);
        cache.insert(TileKey::new("item", tile), vec![1]);
        assert!(cache.contains(&TileKey::new("item", tile)));
        assert!(!cache.contains(&TileKey::new("item", tile).with_epsg(4326)));
    }
}
