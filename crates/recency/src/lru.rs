//! LRU (Least Recently Used) cache implementation
//!
//! Nodes live in an arena (`Vec`) and link to each other by slot index. Slots
//! 0 and 1 are permanent head/tail sentinels, so linking and unlinking never
//! special-case the ends of the list. The list runs from most recently used
//! (after head) to least recently used (before tail).

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use ahash::RandomState;
use hashbrown::HashTable;

use crate::capacity::Capacity;
use crate::error::Result;
use crate::iter::Iter;

/// Slot of the head sentinel
pub(crate) const HEAD: usize = 0;

/// Slot of the tail sentinel
pub(crate) const TAIL: usize = 1;

/// Upper bound on slots reserved up front; larger caches grow on demand.
const PREALLOC_LIMIT: usize = 4096;

/// Key/value pair held by a live node
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

/// Node in the LRU doubly-linked list
///
/// `entry` is `None` for the sentinels and for slots on the free list.
pub(crate) struct Node<K, V> {
    pub(crate) entry: Option<Entry<K, V>>,
    pub(crate) prev: usize,
    pub(crate) next: usize,
}

impl<K, V> Node<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: HEAD,
            next: TAIL,
        }
    }
}

/// LRU cache with fixed capacity
///
/// Keys only need `Hash + Eq`: each key is stored once, in its node, and the
/// index holds slot numbers that it hashes through the node's key.
///
/// ```
/// use recency::LruCache;
///
/// let mut cache = LruCache::new(2).unwrap();
/// cache.set("a", 1);
/// cache.set("b", 2);
/// assert_eq!(cache.get("a"), Some(&1));
///
/// // "b" is now the least recently used entry
/// assert_eq!(cache.set("c", 3), Some(2));
/// assert_eq!(cache.get("b"), None);
/// ```
pub struct LruCache<K, V> {
    index: HashTable<usize>,
    hasher: RandomState,
    nodes: Vec<Node<K, V>>,
    free_list: Vec<usize>,
    capacity: Capacity,
}

/// Hash of the key stored in slot `idx`
fn slot_hash<K: Hash, V>(hasher: &RandomState, nodes: &[Node<K, V>], idx: usize) -> u64 {
    nodes[idx]
        .entry
        .as_ref()
        .map_or(0, |entry| hasher.hash_one(&entry.key))
}

/// Whether slot `idx` holds `key`
fn slot_matches<K, V, Q>(nodes: &[Node<K, V>], idx: usize, key: &Q) -> bool
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    nodes[idx]
        .entry
        .as_ref()
        .is_some_and(|entry| <K as Borrow<Q>>::borrow(&entry.key) == key)
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Returns
    /// * `Err(Error::InvalidCapacity)` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from_capacity(Capacity::new(capacity)?))
    }

    /// Create a new LRU cache from an already validated capacity
    pub fn from_capacity(capacity: Capacity) -> Self {
        // `set` links the new node before evicting, so one extra slot is live
        let reserved = capacity.get().min(PREALLOC_LIMIT) + 1;
        let mut nodes = Vec::with_capacity(reserved + 2);
        nodes.push(Node::sentinel());
        nodes.push(Node::sentinel());

        Self {
            index: HashTable::with_capacity(reserved),
            hasher: RandomState::new(),
            nodes,
            free_list: Vec::new(),
            capacity,
        }
    }

    /// Get a value from the cache, marking it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.find(key)?;
        self.move_to_head(idx);
        self.nodes[idx].entry.as_ref().map(|entry| &entry.value)
    }

    /// Get a mutable reference to a value, marking it most recently used
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.find(key)?;
        self.move_to_head(idx);
        self.nodes[idx].entry.as_mut().map(|entry| &mut entry.value)
    }

    /// Get a value without touching recency order
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.find(key)?;
        self.nodes[idx].entry.as_ref().map(|entry| &entry.value)
    }

    /// Check whether a key is cached without touching recency order
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Insert or overwrite a key-value pair, marking it most recently used
    ///
    /// # Returns
    /// * `Some(value)` - the value of the least recently used entry, if
    ///   inserting a new key pushed the cache over capacity
    /// * `None` - nothing was evicted
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hasher.hash_one(&key);
        let nodes = &self.nodes;
        let existing = self
            .index
            .find(hash, |&i| slot_matches(nodes, i, &key))
            .copied();
        if let Some(idx) = existing {
            if let Some(entry) = &mut self.nodes[idx].entry {
                entry.value = value;
            }
            self.move_to_head(idx);
            return None;
        }

        let idx = self.alloc_node(Entry { key, value });
        self.attach(idx);
        let (hasher, nodes) = (&self.hasher, &self.nodes);
        self.index
            .insert_unique(hash, idx, |&i| slot_hash(hasher, nodes, i));

        if self.index.len() > self.capacity.get() {
            return self.pop_tail().map(|entry| entry.value);
        }
        None
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hasher.hash_one(key);
        let nodes = &self.nodes;
        let (idx, _) = self
            .index
            .find_entry(hash, |&i| slot_matches(nodes, i, key))
            .ok()?
            .remove();
        self.detach(idx);
        self.free_node(idx).map(|entry| entry.value)
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.truncate(2);
        self.free_list.clear();
        self.nodes[HEAD].next = TAIL;
        self.nodes[TAIL].prev = HEAD;
    }

    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hasher.hash_one(key);
        self.index
            .find(hash, |&i| slot_matches(&self.nodes, i, key))
            .copied()
    }

    /// Unlink the least recently used node and drop it from the index.
    fn pop_tail(&mut self) -> Option<Entry<K, V>> {
        let idx = self.nodes[TAIL].prev;
        if idx == HEAD {
            return None;
        }

        self.detach(idx);
        let entry = self.free_node(idx)?;
        let hash = self.hasher.hash_one(&entry.key);
        if let Ok(slot) = self.index.find_entry(hash, |&i| i == idx) {
            slot.remove();
        }
        Some(entry)
    }
}

impl<K, V> LruCache<K, V> {
    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get the cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Iterate over entries from most to least recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.index.len())
    }

    fn move_to_head(&mut self, idx: usize) {
        self.detach(idx);
        self.attach(idx);
    }

    /// Link `idx` directly after the head sentinel.
    fn attach(&mut self, idx: usize) {
        let next = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = next;
        self.nodes[HEAD].next = idx;
        self.nodes[next].prev = idx;
    }

    /// Splice `idx` out of the list. Never called on a sentinel.
    fn detach(&mut self, idx: usize) {
        debug_assert!(idx != HEAD && idx != TAIL, "detach on sentinel");
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn alloc_node(&mut self, entry: Entry<K, V>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx].entry = Some(entry);
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(Node {
                entry: Some(entry),
                prev: HEAD,
                next: TAIL,
            });
            idx
        }
    }

    fn free_node(&mut self, idx: usize) -> Option<Entry<K, V>> {
        self.free_list.push(idx);
        self.nodes[idx].entry.take()
    }
}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
