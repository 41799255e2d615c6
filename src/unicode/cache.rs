//! Bounded least-recently-used cache of visible widths.
//!
//! Nodes live in a slab and are linked by index, so lookup, promotion and
//! eviction are all O(1). The slab never grows beyond the capacity: an
//! insert into a full cache reuses the evicted tail slot.

use rustc_hash::FxHashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Capacity of the process-wide width cache.
pub const WIDTH_CACHE_CAPACITY: usize = 512;

const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node {
    key: Arc<str>,
    width: usize,
    prev: usize,
    next: usize,
}

#[derive(Debug)]
struct Lru {
    index: FxHashMap<Arc<str>, usize>,
    nodes: Vec<Node>,
    /// Most recently used.
    head: usize,
    /// Least recently used.
    tail: usize,
    capacity: usize,
}

impl Lru {
    fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::default(),
            nodes: Vec::with_capacity(capacity.min(WIDTH_CACHE_CAPACITY)),
            head: NIL,
            tail: NIL,
            capacity,
        }
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }

    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn promote(&mut self, idx: usize) {
        if self.head != idx {
            self.detach(idx);
            self.push_front(idx);
        }
    }

    fn insert(&mut self, key: &str, width: usize) {
        if self.capacity == 0 {
            return;
        }
        if let Some(&idx) = self.index.get(key) {
            self.nodes[idx].width = width;
            self.promote(idx);
            return;
        }

        let key: Arc<str> = Arc::from(key);
        let idx = if self.nodes.len() < self.capacity {
            self.nodes.push(Node {
                key: Arc::clone(&key),
                width,
                prev: NIL,
                next: NIL,
            });
            self.nodes.len() - 1
        } else {
            let victim = self.tail;
            self.detach(victim);
            self.index.remove(&self.nodes[victim].key);
            let node = &mut self.nodes[victim];
            node.key = Arc::clone(&key);
            node.width = width;
            victim
        };
        self.index.insert(key, idx);
        self.push_front(idx);
    }
}

/// Thread-safe LRU map from string to visible column count.
///
/// Lookups take the read lock, then briefly take the write lock to move the
/// hit to the front.
#[derive(Debug)]
pub struct WidthCache {
    inner: RwLock<Lru>,
}

impl WidthCache {
    /// Create a cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Lru::new(capacity)),
        }
    }

    /// Look up a width, promoting the entry to most recently used.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<usize> {
        let (idx, width) = {
            let lru = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            let idx = *lru.index.get(key)?;
            (idx, lru.nodes[idx].width)
        };

        let mut lru = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // The slot may have been recycled between the two locks.
        if lru.nodes.get(idx).is_some_and(|node| &*node.key == key) {
            lru.promote(idx);
        }
        Some(width)
    }

    /// Insert or refresh an entry, evicting the least recently used one when full.
    pub fn insert(&self, key: &str, width: usize) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, width);
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .index
            .len()
    }

    /// True when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .capacity
    }

    /// Check presence without touching recency.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .index
            .contains_key(key)
    }
}

/// The process-wide cache used by [`visible_width`](super::visible_width).
pub fn global_width_cache() -> &'static WidthCache {
    static CACHE: OnceLock<WidthCache> = OnceLock::new();
    CACHE.get_or_init(|| WidthCache::new(WIDTH_CACHE_CAPACITY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = WidthCache::new(4);
        cache.insert("日本", 4);
        assert_eq!(cache.get("日本"), Some(4));
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = WidthCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 1);
        // Touch "a" so "b" becomes the eviction candidate.
        assert_eq!(cache.get("a"), Some(1));
        cache.insert("c", 1);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_reinsert_refreshes_value() {
        let cache = WidthCache::new(2);
        cache.insert("x", 1);
        cache.insert("x", 2);
        assert_eq!(cache.get("x"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_size_never_exceeds_capacity() {
        let cache = WidthCache::new(26);
        for i in 0..100u32 {
            let letter = char::from(b'a' + (i % 26) as u8);
            let key = format!("{letter}é{i}");
            cache.insert(&key, 2);
            assert!(cache.len() <= 26);
        }
        assert_eq!(cache.len(), 26);
    }

    #[test]
    fn test_keyspace_wraps_without_growth() {
        let cache = WidthCache::new(26);
        for i in 0..100u32 {
            let letter = char::from(b'a' + (i % 26) as u8);
            cache.insert(&format!("{letter}ü"), 1);
        }
        assert_eq!(cache.len(), 26);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = WidthCache::new(0);
        cache.insert("é", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get("é"), None);
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(WidthCache::new(16));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        let key = format!("{t}-{}-ö", i % 40);
                        if cache.get(&key).is_none() {
                            cache.insert(&key, 1);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 16);
    }
}
