// Two-generation memoization cache with O(1) eviction

use std::hash::Hash;

use hashbrown::HashMap;
use serde::Serialize;

/// Hit, miss and promotion counters for a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Number of entries promoted from the second-chance generation back
    /// into the hot generation.
    pub swaps: u64,
}

/// A bounded cache that keeps a hot generation and a second-chance
/// generation.
///
/// New entries go into generation 0. When generation 0 is full and a new key
/// arrives, the whole of generation 0 becomes generation 1 (dropping the
/// previous generation 1) and a fresh generation 0 is started. A lookup that
/// hits generation 1 moves that entry back into generation 0.
///
/// This approximates LRU without per-entry bookkeeping: every operation is
/// O(1) and an entry is held by exactly one generation at a time. Entries
/// survive at least `max_l0_size` insertions after their last use.
#[derive(Debug, Clone)]
pub struct SecondChanceCache<K, V> {
    max_l0_size: usize,
    l0: HashMap<K, V>,
    l1: HashMap<K, V>,
    stats: CacheStats,
}

impl<K: Hash + Eq, V> SecondChanceCache<K, V> {
    /// Create a cache whose hot generation holds at most `max_l0_size`
    /// entries (at least one).
    pub fn new(max_l0_size: usize) -> Self {
        let max_l0_size = max_l0_size.max(1);
        Self {
            max_l0_size,
            l0: HashMap::with_capacity(max_l0_size),
            l1: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Whether the key is cached. A generation-1 hit is promoted.
    pub fn has(&mut self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Look up a value, promoting it from generation 1 if needed.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.l0.contains_key(key) {
            self.stats.hits += 1;
            return self.l0.get(key);
        }
        match self.l1.remove_entry(key) {
            Some((k, v)) => {
                self.stats.hits += 1;
                self.stats.swaps += 1;
                self.insert_l0(k, v);
                self.l0.get(key)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: K, value: V) {
        if let Some(slot) = self.l0.get_mut(&key) {
            *slot = value;
            return;
        }
        self.l1.remove(&key);
        self.insert_l0(key, value);
    }

    /// Return the cached value, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> &V
    where
        K: Clone,
    {
        if self.get(&key).is_none() {
            let value = compute(&key);
            self.set(key.clone(), value);
        }
        // The entry was either found in (or promoted to) generation 0, or
        // just inserted there; `set` never demotes the key it inserts.
        &self.l0[&key]
    }

    /// Remove a key from both generations.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.l0.remove(key).or_else(|| self.l1.remove(key))
    }

    fn insert_l0(&mut self, key: K, value: V) {
        if self.l0.len() >= self.max_l0_size {
            self.l1 = std::mem::replace(&mut self.l0, HashMap::with_capacity(self.max_l0_size));
        }
        self.l0.insert(key, value);
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.l0.clear();
        self.l1.clear();
        self.stats = CacheStats::default();
    }

    pub fn size(&self) -> usize {
        self.l0.len() + self.l1.len()
    }

    pub fn size0(&self) -> usize {
        self.l0.len()
    }

    pub fn size1(&self) -> usize {
        self.l1.len()
    }

    pub fn max_l0_size(&self) -> usize {
        self.max_l0_size
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
