//! Module provide ordered-map implemented by [RbMap] type.
//!
//! RbMap is implemented using classic [red-black][wiki-rb] tree, with
//! parent links, bottom-up insert-fixup and delete-fixup.
//!
//! - Each entry in RbMap instance correspond to a {Key, Value} pair.
//! - Parametrised over `key-type` and `value-type`.
//! - CRUD operations, via insert(), set(), get(), remove() api.
//! - Full table scan, to iterate over all entries.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Nodes are held in an arena owned by the map, `parent`, `left` and
//! `right` are indices into that arena. Only the map owns nodes, parent
//! links are plain back-references.
//!
//! [wiki-rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use tracing::{debug, error, warn};

use std::{
    borrow::Borrow,
    cmp::{Ord, Ordering},
    fmt,
    iter::FromIterator,
};

use crate::{
    iter::{Iter, Keys, Values},
    node::{Arena, Color, Link, Side},
    Error, Result,
};

/// RbMap manage a single instance of in-memory ordered-map using
/// [red-black][rb] tree.
///
/// [rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
#[derive(Clone)]
pub struct RbMap<K, V> {
    root: Link,
    arena: Arena<K, V>,
    n_count: usize, // number of entries in the tree.
}

impl<K, V> RbMap<K, V> {
    /// Create an empty instance of RbMap.
    pub fn new() -> RbMap<K, V> {
        RbMap {
            root: None,
            arena: Arena::new(),
            n_count: Default::default(),
        }
    }
}

impl<K, V> Default for RbMap<K, V> {
    fn default() -> Self {
        RbMap::new()
    }
}

impl<K, V> Extend<(K, V)> for RbMap<K, V>
where
    K: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            if let Err(err) = self.insert(key, value) {
                panic!("extend(): {}", err)
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RbMap<K, V>
where
    K: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut index = RbMap::new();
        index.extend(iter);
        index
    }
}

impl<'a, K, V> IntoIterator for &'a RbMap<K, V>
where
    K: Ord,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> fmt::Debug for RbMap<K, V>
where
    K: Ord + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Maintenance API.
impl<K, V> RbMap<K, V> {
    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Drop all entries, keys and values are dropped exactly once. The
    /// instance can be reused afterwards.
    pub fn clear(&mut self) {
        debug!(n_count = self.n_count, "clear rbmap");
        self.root = None;
        self.arena.clear();
        self.n_count = 0;
    }
}

/// Write API.
impl<K, V> RbMap<K, V> {
    /// Insert `value` for `key`. If there is an existing entry for key,
    /// the old value is dropped and replaced, without changing the
    /// shape of the tree.
    ///
    /// ```
    /// use rbmap::RbMap;
    ///
    /// let mut index: RbMap<&str, u32> = RbMap::new();
    /// index.insert("A", 1).unwrap();
    /// index.insert("A", 99).unwrap();
    /// assert_eq!(index.len(), 1);
    /// assert_eq!(index.get("A"), Some(&99));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<()>
    where
        K: Ord,
    {
        self.set(key, value).map(|_| ())
    }

    /// Set value for key. If there is an existing entry for key,
    /// overwrite the old value with new value and return the old value.
    ///
    /// On [Error::AllocationFailure] the map is left unchanged.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>>
    where
        K: Ord,
    {
        let (mut parent, mut side): (Link, Side) = (None, Side::Left);
        let mut link = self.root;
        while let Some(off) = link {
            let node = self.arena.node(off);
            parent = Some(off);
            link = match key.cmp(&node.key) {
                Ordering::Greater => {
                    side = Side::Right;
                    node.right
                }
                Ordering::Less => {
                    side = Side::Left;
                    node.left
                }
                Ordering::Equal => {
                    let old_value = self.arena.node_mut(off).set_value(value);
                    return Ok(Some(old_value));
                }
            };
        }

        let off = match self.arena.alloc(key, value, parent) {
            Ok(off) => off,
            Err(err) => {
                warn!(n_count = self.n_count, "insert failed: {}", err);
                return Err(err);
            }
        };
        match parent {
            Some(parent) => self.arena.node_mut(parent).set_child(side, Some(off)),
            None => self.root = Some(off),
        }
        self.n_count += 1;
        self.insert_fixup(off);

        Ok(None)
    }

    /// Remove key from this instance and return its value. If key is
    /// not present, then remove is effectively a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.find(key)?;

        // with two children, the entry moves into the in-order successor,
        // which has at most one child, and the successor is unlinked.
        let node = self.arena.node(found);
        let target = match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let succ = self.arena.leftmost(right);
                self.arena.swap_entries(found, succ);
                succ
            }
            _ => found,
        };

        let node = self.arena.node(target);
        let (parent, color) = (node.parent, node.color);
        match node.left.or(node.right) {
            Some(child) => {
                // target is black with a single red child.
                self.replace_child(parent, target, Some(child));
                let child = self.arena.node_mut(child);
                child.parent = parent;
                child.set_black();
            }
            None => match parent {
                Some(parent) => {
                    let side = self.side_of(parent, target);
                    self.arena.node_mut(parent).set_child(side, None);
                    if color == Color::Black {
                        self.remove_fixup(parent, side);
                    }
                }
                None => self.root = None,
            },
        }

        self.n_count -= 1;
        Some(self.arena.release(target).value)
    }
}

/// Read API.
impl<K, V> RbMap<K, V> {
    /// Get the value for key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let off = self.find(key)?;
        Some(&self.arena.node(off).value)
    }

    /// Get a mutable reference to the value for key. Key, and hence the
    /// shape of the tree, cannot be changed through this reference.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let off = self.find(key)?;
        Some(&mut self.arena.node_mut(off).value)
    }

    /// Get the stored key and its value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.arena.node(self.find(key)?);
        Some((&node.key, &node.value))
    }

    /// Check whether key is present in this instance.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Return an iterator over all entries in this instance, in
    /// ascending key order.
    ///
    /// ```
    /// use rbmap::RbMap;
    ///
    /// let mut index: RbMap<String,String> = RbMap::new();
    /// index.insert("key2".to_string(), "value2".to_string()).unwrap();
    /// index.insert("key1".to_string(), "value1".to_string()).unwrap();
    ///
    /// for (i, (key, value)) in index.iter().enumerate() {
    ///     let refkey = format!("key{}", i+1);
    ///     let refval = format!("value{}", i+1);
    ///     assert_eq!(&refkey, key);
    ///     assert_eq!(&refval, value);
    /// }
    /// ```
    pub fn iter(&self) -> Iter<K, V> {
        let first = self.root.map(|root| self.arena.leftmost(root));
        Iter::new(&self.arena, first, self.n_count)
    }

    /// Return an iterator over all keys, in ascending order.
    pub fn keys(&self) -> Keys<K, V> {
        Keys::new(self.iter())
    }

    /// Return an iterator over all values, in ascending order of their
    /// keys.
    pub fn values(&self) -> Values<K, V> {
        Values::new(self.iter())
    }

    /// Validate red-black tree with following rules:
    ///
    /// * Root node is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Make sure keys are in sorted order.
    /// * Every child links back to its parent.
    /// * Entry count matches the number of nodes in the tree.
    pub fn validate(&self) -> Result<()>
    where
        K: Ord + fmt::Debug,
    {
        let res = self.do_validate();
        if let Err(err) = &res {
            error!("validate: {}", err);
        }
        res
    }
}

impl<K, V> RbMap<K, V> {
    fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut link = self.root;
        while let Some(off) = link {
            let node = self.arena.node(off);
            link = match node.key.borrow().cmp(key) {
                Ordering::Less => node.right,
                Ordering::Greater => node.left,
                Ordering::Equal => return Some(off),
            };
        }
        None
    }

    #[inline]
    fn is_red(&self, link: Link) -> bool {
        link.map_or(false, |off| self.arena.node(off).is_red())
    }

    #[inline]
    fn is_black(&self, link: Link) -> bool {
        !self.is_red(link)
    }

    fn side_of(&self, parent: usize, child: usize) -> Side {
        match self.arena.node(parent).left {
            Some(left) if left == child => Side::Left,
            _ => Side::Right,
        }
    }

    // point the link that refers to `old` (from its parent, or root) to `new`.
    fn replace_child(&mut self, parent: Link, old: usize, new: Link) {
        match parent {
            Some(parent) => {
                let side = self.side_of(parent, old);
                self.arena.node_mut(parent).set_child(side, new)
            }
            None => self.root = new,
        }
    }

    fn insert_fixup(&mut self, mut node: usize) {
        loop {
            let parent = match self.arena.node(node).parent {
                Some(parent) => parent,
                None => {
                    self.arena.node_mut(node).set_black();
                    break;
                }
            };
            if self.arena.node(parent).is_black() {
                break;
            }
            let grand = match self.arena.node(parent).parent {
                Some(grand) => grand,
                None => {
                    // red root, only its color is wrong.
                    self.arena.node_mut(parent).set_black();
                    break;
                }
            };

            let side = self.side_of(grand, parent);
            let uncle = self.arena.node(grand).child(side.flip());

            //         g(B)              g(R) <- node
            //         /  \              /  \
            //       p(R)  u(R)  -->   p(B)  u(B)
            //       /                 /
            //     n(R)              n(R)
            if let Some(uncle) = uncle.filter(|u| self.arena.node(*u).is_red()) {
                self.arena.node_mut(parent).set_black();
                self.arena.node_mut(uncle).set_black();
                self.arena.node_mut(grand).set_red();
                node = grand;
                continue;
            }

            //         g(B)              g(B)
            //         /  \              /  \
            //       p(R)  u(B)  -->   n(R)  u(B)
            //         \               /
            //         n(R)          p(R)
            let mut parent = parent;
            if self.arena.node(parent).child(side.flip()) == Some(node) {
                self.rotate(parent, side);
                parent = node;
            }

            //         g(B)              p(B)
            //         /  \              /  \
            //       p(R)  u(B)  -->   n(R)  g(R)
            //       /                         \
            //     n(R)                        u(B)
            self.arena.node_mut(parent).set_black();
            self.arena.node_mut(grand).set_red();
            self.rotate(grand, side.flip());
            break;
        }
    }

    // `parent` lost a black node on its `side`, the deficient position
    // starts out as the vacated, absent, child.
    fn remove_fixup(&mut self, mut parent: usize, mut side: Side) {
        let mut db: Link = None;
        loop {
            if let Some(off) = db {
                if self.arena.node(off).is_red() {
                    self.arena.node_mut(off).set_black();
                    break;
                }
            }

            let far_side = side.flip();
            let sibling = match self.arena.node(parent).child(far_side) {
                Some(sibling) => sibling,
                None => panic!("remove_fixup(): no sibling, call the programmer"),
            };

            //        p(B)              s(B)
            //        /  \              /  \
            //      db   s(R)   -->   p(R)  f(B)
            //           /  \         /  \
            //         n(B)  f(B)   db   n(B)
            if self.arena.node(sibling).is_red() {
                self.arena.node_mut(parent).set_red();
                self.arena.node_mut(sibling).set_black();
                self.rotate(parent, side);
                continue;
            }

            let near = self.arena.node(sibling).child(side);
            let far = self.arena.node(sibling).child(far_side);

            //         p                  p <- db
            //        / \                / \
            //      db   s(B)   -->     #   s(R)
            //           /  \               /  \
            //         n(B)  f(B)         n(B)  f(B)
            if self.is_black(near) && self.is_black(far) {
                self.arena.node_mut(sibling).set_red();
                db = Some(parent);
                match self.arena.node(parent).parent {
                    Some(grand) => {
                        side = self.side_of(grand, parent);
                        parent = grand;
                    }
                    None => break,
                }
                continue;
            }

            let color = self.arena.node(parent).color;
            match (near, far) {
                //        p(?)               n(?)
                //        /  \               /  \
                //      db   s(B)   -->   p(B)  s(B)
                //           /  \          /       \
                //         n(R)  f(B)     db       f(B)
                (Some(near), _) if self.is_black(far) => {
                    self.arena.node_mut(near).color = color;
                    self.arena.node_mut(parent).set_black();
                    self.rotate(sibling, far_side);
                    self.rotate(parent, side);
                }
                //        p(?)               s(?)
                //        /  \               /  \
                //      db   s(B)   -->   p(B)  f(B)
                //             \          /
                //             f(R)      db
                (_, Some(far)) => {
                    self.arena.node_mut(sibling).color = color;
                    self.arena.node_mut(far).set_black();
                    self.arena.node_mut(parent).set_black();
                    self.rotate(parent, side);
                }
                _ => unreachable!(),
            }
            break;
        }
    }

    // `node` moves down towards `side`, its child on the other side takes
    // its place.
    fn rotate(&mut self, node: usize, side: Side) {
        match side {
            Side::Left => self.rotate_left(node),
            Side::Right => self.rotate_right(node),
        }
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //          left      x              node      xr
    //                   / \             /  \
    //                 xl   xr        left   xl
    //
    fn rotate_left(&mut self, node: usize) {
        let x = match self.arena.node(node).right {
            Some(x) => x,
            None => return,
        };
        let xl = self.arena.node(x).left;
        self.arena.node_mut(node).right = xl;
        if let Some(xl) = xl {
            self.arena.node_mut(xl).parent = Some(node);
        }
        let parent = self.arena.node(node).parent;
        self.replace_child(parent, node, Some(x));
        self.arena.node_mut(x).parent = parent;
        self.arena.node_mut(x).left = Some(node);
        self.arena.node_mut(node).parent = Some(x);
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //           x       right             xl     node
    //          / \                               / \
    //        xl   xr                           xr  right
    //
    fn rotate_right(&mut self, node: usize) {
        let x = match self.arena.node(node).left {
            Some(x) => x,
            None => return,
        };
        let xr = self.arena.node(x).right;
        self.arena.node_mut(node).left = xr;
        if let Some(xr) = xr {
            self.arena.node_mut(xr).parent = Some(node);
        }
        let parent = self.arena.node(node).parent;
        self.replace_child(parent, node, Some(x));
        self.arena.node_mut(x).parent = parent;
        self.arena.node_mut(x).right = Some(node);
        self.arena.node_mut(node).parent = Some(x);
    }

    fn do_validate(&self) -> Result<()>
    where
        K: Ord + fmt::Debug,
    {
        if self.is_red(self.root) {
            err_at!(Fatal, msg: "red root")?;
        }
        if let Some(root) = self.root {
            if let Some(parent) = self.arena.node(root).parent {
                err_at!(Fatal, msg: "root has parent {}", parent)?;
            }
        }

        let (n_count, n_blacks) = (0, 0);
        let (n_count, _) = self.validate_tree(self.root, false, n_count, n_blacks)?;
        if n_count != self.n_count {
            err_at!(Fatal, msg: "mismatch in count {} != {}", n_count, self.n_count)?;
        }
        let occupied = self.arena.occupied();
        if occupied != self.n_count {
            err_at!(Fatal, msg: "mismatch in arena {} != {}", occupied, self.n_count)?;
        }
        Ok(())
    }

    fn validate_tree(
        &self,
        link: Link,
        fromred: bool,
        mut n_count: usize,
        mut n_blacks: usize,
    ) -> Result<(usize, usize)>
    where
        K: Ord + fmt::Debug,
    {
        let off = match link {
            Some(off) => off,
            None => return Ok((n_count, n_blacks)),
        };
        let node = self.arena.node(off);

        let red = node.is_red();
        if fromred && red {
            return err_at!(Fatal, msg: "consecutive reds at {:?}", node.key)?;
        }
        if !red {
            n_blacks += 1;
        }
        n_count += 1;

        for child in [node.left, node.right].iter().flatten() {
            let parent = self.arena.node(*child).parent;
            if parent != Some(off) {
                err_at!(Fatal, msg: "parent link {:?} != {}", parent, off)?;
            }
        }

        let (n_count, lblacks) = self.validate_tree(node.left, red, n_count, n_blacks)?;
        let (n_count, rblacks) = self.validate_tree(node.right, red, n_count, n_blacks)?;
        if lblacks != rblacks {
            err_at!(Fatal, msg: "unbalanced blacks {} {}", lblacks, rblacks)?;
        }

        if let Some(left) = node.left {
            let lkey = &self.arena.node(left).key;
            if lkey.ge(&node.key) {
                err_at!(Fatal, msg: "sort lkey:{:?} parent:{:?}", lkey, node.key)?;
            }
        }
        if let Some(right) = node.right {
            let rkey = &self.arena.node(right).key;
            if rkey.le(&node.key) {
                err_at!(Fatal, msg: "sort rkey:{:?} parent:{:?}", rkey, node.key)?;
            }
        }

        Ok((n_count, lblacks))
    }
}

#[cfg(test)]
#[path = "rbmap_test.rs"]
mod rbmap_test;
