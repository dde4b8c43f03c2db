use std::hash::Hash;

use indexmap::IndexMap;
use tracing::trace;

/// Runtime metrics exposed by [`ResourceCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    used: bool,
}

/// Surface-side cache of derived resources (brushes, pens, fonts).
///
/// Eviction is by last-use flag: [`ResourceCache::clean_up`] drops every entry
/// not touched since the previous clean-up and clears the flag on the rest.
#[derive(Debug)]
pub struct ResourceCache<K, V> {
    entries: IndexMap<K, Entry<V>>,
    touched_since_clean_up: bool,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K, V> Default for ResourceCache<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            touched_since_clean_up: false,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }
}

impl<K: Hash + Eq, V> ResourceCache<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, creating it with `create` on a miss.
    pub fn get_or_insert_with(&mut self, key: K, create: impl FnOnce() -> V) -> &V {
        self.touched_since_clean_up = true;
        let entry = match self.entries.entry(key) {
            indexmap::map::Entry::Occupied(occupied) => {
                self.hits = self.hits.saturating_add(1);
                occupied.into_mut()
            }
            indexmap::map::Entry::Vacant(vacant) => {
                self.misses = self.misses.saturating_add(1);
                vacant.insert(Entry {
                    value: create(),
                    used: false,
                })
            }
        };
        entry.used = true;
        &entry.value
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evicts entries unused since the previous call.
    ///
    /// Calling it again without any intervening access is a no-op, so a
    /// doubled clean-up at the end of a pass keeps the pass's resources.
    pub fn clean_up(&mut self) {
        if !self.touched_since_clean_up {
            return;
        }
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.used);
        for entry in self.entries.values_mut() {
            entry.used = false;
        }
        let evicted = before - self.entries.len();
        self.evictions = self.evictions.saturating_add(evicted as u64);
        self.touched_since_clean_up = false;
        trace!(evicted, remaining = self.entries.len(), "resource cache clean-up");
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.touched_since_clean_up = false;
    }

    #[must_use]
    pub fn stats(&self) -> ResourceCacheStats {
        ResourceCacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_entries_are_evicted() {
        let mut cache = ResourceCache::new();
        cache.get_or_insert_with("a", || 1);
        cache.get_or_insert_with("b", || 2);
        cache.clean_up();
        assert_eq!(cache.len(), 2);

        cache.get_or_insert_with("a", || 10);
        cache.clean_up();
        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn repeated_clean_up_is_idempotent() {
        let mut cache = ResourceCache::new();
        cache.get_or_insert_with(1_u8, || "pen");
        cache.clean_up();
        cache.clean_up();
        assert_eq!(cache.len(), 1);
    }
}
