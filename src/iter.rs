//! In-order traversal over [RbMap][crate::RbMap].
//!
//! Iterators walk the tree using parent links, without recursion and
//! without an auxiliary stack. Each iterator holds a shared borrow of the
//! map, mutating the map while it is alive does not compile.

use std::iter::FusedIterator;

use crate::node::{Arena, Link};

/// Iterator over `(key, value)` pairs in ascending key order, refer
/// [RbMap::iter][crate::RbMap::iter].
pub struct Iter<'a, K, V> {
    arena: &'a Arena<K, V>,
    next: Link,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<K, V>, first: Link, n_count: usize) -> Self {
        Iter {
            arena,
            next: first,
            remaining: n_count,
        }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            arena: self.arena,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Ord,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        let node = arena.node(self.next?);

        self.next = match node.right {
            Some(right) => Some(arena.leftmost(right)),
            None => {
                // climb till an ancestor is greater than this node.
                let mut up = node.parent;
                while let Some(off) = up {
                    let ancestor = arena.node(off);
                    if ancestor.key > node.key {
                        break;
                    }
                    up = ancestor.parent;
                }
                up
            }
        };
        self.remaining = self.remaining.saturating_sub(1);

        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> where K: Ord {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> where K: Ord {}

/// Iterator over keys in ascending order, refer
/// [RbMap::keys][crate::RbMap::keys].
pub struct Keys<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Keys { iter }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V>
where
    K: Ord,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> where K: Ord {}

impl<'a, K, V> FusedIterator for Keys<'a, K, V> where K: Ord {}

/// Iterator over values in ascending order of their keys, refer
/// [RbMap::values][crate::RbMap::values].
pub struct Values<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Values { iter }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V>
where
    K: Ord,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> where K: Ord {}

impl<'a, K, V> FusedIterator for Values<'a, K, V> where K: Ord {}

#[cfg(test)]
#[path = "iter_test.rs"]
mod iter_test;
