use std::mem;

use crate::{Error, Result};

/// Link to a node in the arena, `None` stands for an absent child or for
/// the parent of root.
pub type Link = Option<usize>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Which child of a node, left and right cases in the fixup routines
/// are mirror images, parametrised over this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn flip(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Node corresponds to a single entry in RbMap instance.
#[derive(Clone)]
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub color: Color,
    pub parent: Link, // back-reference, never owns
    pub left: Link,
    pub right: Link,
}

impl<K, V> Node<K, V> {
    // new nodes are always red, insert-fixup recolors as needed.
    fn new(key: K, value: V, parent: Link) -> Node<K, V> {
        Node {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub fn set_red(&mut self) {
        self.color = Color::Red
    }

    #[inline]
    pub fn set_black(&mut self) {
        self.color = Color::Black
    }

    #[inline]
    pub fn set_value(&mut self, value: V) -> V {
        mem::replace(&mut self.value, value)
    }

    #[inline]
    pub fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub fn set_child(&mut self, side: Side, child: Link) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

/// Slot storage for tree nodes. Every node of a map lives here, links
/// between nodes are indices into `slots`. Vacated slots are recycled
/// via `free`.
#[derive(Clone)]
pub struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Arena<K, V> {
        Arena {
            slots: Vec::default(),
            free: Vec::default(),
        }
    }

    /// Allocate a red node holding `key` and `value`. Memory is reserved
    /// before anything is written, so on failure the arena is untouched.
    pub fn alloc(&mut self, key: K, value: V, parent: Link) -> Result<usize> {
        match self.free.pop() {
            Some(off) => {
                self.slots[off] = Some(Node::new(key, value, parent));
                Ok(off)
            }
            None => {
                // reserve room in the free list as well, so that `release`
                // never has to grow it.
                err_at!(AllocationFailure, self.slots.try_reserve(1), "node")?;
                err_at!(AllocationFailure, self.free.try_reserve(self.slots.len() + 1))?;
                let off = self.slots.len();
                self.slots.push(Some(Node::new(key, value, parent)));
                Ok(off)
            }
        }
    }

    /// Take the node out of its slot, the slot is recycled by a later
    /// `alloc`.
    pub fn release(&mut self, off: usize) -> Node<K, V> {
        match self.slots.get_mut(off).and_then(Option::take) {
            Some(node) => {
                self.free.push(off);
                node
            }
            None => panic!("release(): vacant slot {}, call the programmer", off),
        }
    }

    /// Drop every node, iteratively.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[inline]
    pub fn node(&self, off: usize) -> &Node<K, V> {
        match self.slots.get(off) {
            Some(Some(node)) => node,
            _ => panic!("node(): dangling link {}, call the programmer", off),
        }
    }

    #[inline]
    pub fn node_mut(&mut self, off: usize) -> &mut Node<K, V> {
        match self.slots.get_mut(off) {
            Some(Some(node)) => node,
            _ => panic!("node_mut(): dangling link {}, call the programmer", off),
        }
    }

    /// Descend left from `off` till there is no left child.
    pub fn leftmost(&self, mut off: usize) -> usize {
        while let Some(left) = self.node(off).left {
            off = left;
        }
        off
    }

    /// Exchange key and value between two distinct nodes, links and
    /// colors stay put.
    pub fn swap_entries(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi);
        match (head[lo].as_mut(), tail[0].as_mut()) {
            (Some(x), Some(y)) => {
                mem::swap(&mut x.key, &mut y.key);
                mem::swap(&mut x.value, &mut y.value);
            }
            _ => panic!("swap_entries(): dangling link {}/{}", a, b),
        }
    }
}

impl<K, V> Default for Arena<K, V> {
    fn default() -> Self {
        Arena::new()
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
