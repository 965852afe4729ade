//! Module provide ordered-set implemented by [RbSet] type, a thin layer
//! over [RbMap] with unit values.

use std::{borrow::Borrow, fmt, iter::FromIterator};

use crate::{iter::Keys, RbMap, Result};

/// RbSet manage a single instance of in-memory ordered-set, refer
/// [RbMap] for details.
///
/// ```
/// use rbmap::RbSet;
///
/// let mut set: RbSet<u32> = RbSet::new();
/// assert!(set.insert(20).unwrap());
/// assert!(set.insert(10).unwrap());
/// assert!(!set.insert(20).unwrap());
///
/// let items: Vec<u32> = set.iter().copied().collect();
/// assert_eq!(items, vec![10, 20]);
///
/// assert!(set.remove(&10));
/// assert!(!set.contains(&10));
/// ```
#[derive(Clone)]
pub struct RbSet<T> {
    map: RbMap<T, ()>,
}

impl<T> RbSet<T> {
    /// Create an empty instance of RbSet.
    pub fn new() -> RbSet<T> {
        RbSet { map: RbMap::new() }
    }

    /// Return number of items in this set.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check whether this set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop all items.
    pub fn clear(&mut self) {
        self.map.clear()
    }

    /// Add `value` to the set, return whether it was newly added. An
    /// existing equal item is kept as is and `value` is dropped.
    pub fn insert(&mut self, value: T) -> Result<bool>
    where
        T: Ord,
    {
        if self.map.contains_key(&value) {
            return Ok(false);
        }
        self.map.insert(value, ())?;
        Ok(true)
    }

    /// Remove `value` from the set, return whether it was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.remove(value).is_some()
    }

    /// Return the stored item equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.get_key_value(value).map(|(item, _)| item)
    }

    /// Check whether `value` is in the set.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(value)
    }

    /// Return an iterator over all items in ascending order.
    pub fn iter(&self) -> SetIter<T> {
        SetIter {
            keys: self.map.keys(),
        }
    }

    /// Validate the underlying tree, refer [RbMap::validate].
    pub fn validate(&self) -> Result<()>
    where
        T: Ord + fmt::Debug,
    {
        self.map.validate()
    }
}

impl<T> Default for RbSet<T> {
    fn default() -> Self {
        RbSet::new()
    }
}

impl<T> Extend<T> for RbSet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            if let Err(err) = self.insert(value) {
                panic!("extend(): {}", err)
            }
        }
    }
}

impl<T> FromIterator<T> for RbSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = RbSet::new();
        set.extend(iter);
        set
    }
}

impl<'a, T> IntoIterator for &'a RbSet<T>
where
    T: Ord,
{
    type Item = &'a T;
    type IntoIter = SetIter<'a, T>;

    fn into_iter(self) -> SetIter<'a, T> {
        self.iter()
    }
}

impl<T> fmt::Debug for RbSet<T>
where
    T: Ord + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over items of [RbSet] in ascending order.
pub struct SetIter<'a, T> {
    keys: Keys<'a, T, ()>,
}

impl<'a, T> Iterator for SetIter<'a, T>
where
    T: Ord,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for SetIter<'a, T> where T: Ord {}

#[cfg(test)]
#[path = "rbset_test.rs"]
mod rbset_test;
