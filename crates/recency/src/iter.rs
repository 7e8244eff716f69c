//! Iterator over cache entries

use std::iter::FusedIterator;

use crate::lru::{Node, HEAD, TAIL};

/// Iterator over cache entries, from most to least recently used.
///
/// Created by [`LruCache::iter`](crate::LruCache::iter).
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(nodes: &'a [Node<K, V>], len: usize) -> Self {
        Self {
            nodes,
            front: nodes[HEAD].next,
            back: nodes[TAIL].prev,
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.front];
        self.front = node.next;
        self.remaining -= 1;
        node.entry.as_ref().map(|entry| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.back];
        self.back = node.prev;
        self.remaining -= 1;
        node.entry.as_ref().map(|entry| (&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
