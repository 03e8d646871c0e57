use alloc::vec::Vec;
use core::cell::OnceCell;
use core::fmt;
use core::iter::FusedIterator;

use crate::error::{Error, Relation, Result};
use crate::node::{Node, TreeNode};
use crate::ordering::{Cardinality, Comparator, NaturalOrder};
use crate::sorted_tree::{self, SortedTree};

mod order_statistic;

/// An ordered map backed by an AVL [`SortedTree`].
///
/// Keys are ordered by the comparator `C`. The map carries two independent
/// cardinality policies:
///
/// - the **key** cardinality decides whether one key may map to several
///   values (a multimap);
/// - the **value** cardinality decides, for a multimap, whether the same
///   value may be stored twice under equal keys.
///
/// Values stored under equal keys keep their insertion order.
///
/// # Examples
///
/// ```
/// use osavl_tree::{Cardinality, SortedMap};
///
/// let mut tags = SortedMap::with_cardinality(Cardinality::Duplicate, Cardinality::Distinct);
/// assert!(tags.insert("rust", "systems"));
/// assert!(tags.insert("rust", "safe"));
/// assert!(!tags.insert("rust", "safe"));
/// assert!(tags.insert("go", "simple"));
///
/// assert_eq!(tags.get(&"rust"), Ok(&"systems"));
/// assert_eq!(tags.get_all(&"rust").unwrap(), [&"systems", &"safe"]);
/// assert_eq!(tags.keys().collect::<Vec<_>>(), [&"go", &"rust", &"rust"]);
/// ```
pub struct SortedMap<K, V, C = NaturalOrder> {
    tree: SortedTree<Node<K, V>, C>,
    values: Cardinality,
    snapshot: OnceCell<Vec<(K, V)>>,
}

impl<K, V> SortedMap<K, V> {
    /// Creates an empty map with distinct keys in natural order.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_policy(NaturalOrder, Cardinality::Distinct, Cardinality::Distinct)
    }

    /// Creates an empty map in natural key order with the given key and value
    /// cardinalities.
    #[must_use]
    pub const fn with_cardinality(keys: Cardinality, values: Cardinality) -> Self {
        Self::with_policy(NaturalOrder, keys, values)
    }
}

impl<K, V, C> SortedMap<K, V, C> {
    /// Creates an empty map with distinct keys ordered by `comparator`.
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self::with_policy(comparator, Cardinality::Distinct, Cardinality::Distinct)
    }

    /// Creates an empty map ordered by `comparator` with the given key and
    /// value cardinalities.
    #[must_use]
    pub const fn with_policy(comparator: C, keys: Cardinality, values: Cardinality) -> Self {
        Self {
            tree: SortedTree::with_policy(comparator, keys),
            values,
            snapshot: OnceCell::new(),
        }
    }

    /// Returns the key cardinality.
    pub const fn key_cardinality(&self) -> Cardinality {
        self.tree.cardinality()
    }

    /// Returns the value cardinality.
    pub const fn value_cardinality(&self) -> Cardinality {
        self.values
    }

    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.invalidate();
        self.tree.clear();
    }

    /// Returns the underlying tree for read-only inspection.
    pub const fn tree(&self) -> &SortedTree<Node<K, V>, C> {
        &self.tree
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(entry)
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(entry)
    }

    /// Returns an iterator over the entries in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { inner: self.tree.iter() }
    }

    /// Returns an iterator over the keys in order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns the entries in key order as a slice.
    ///
    /// The slice is cached until the next mutation.
    pub fn entries(&self) -> &[(K, V)]
    where
        K: Clone,
        V: Clone,
    {
        self.snapshot
            .get_or_init(|| self.iter().map(|(key, value)| (key.clone(), value.clone())).collect())
    }

    fn invalidate(&mut self) {
        self.snapshot.take();
    }
}

impl<K, V, C: Comparator<K>> SortedMap<K, V, C> {
    /// Inserts `value` under `key`.
    ///
    /// Returns `false`, and stores nothing, if the keys are distinct and `key`
    /// is already present, or if the values are distinct and `value` is
    /// already stored under an equal key.
    ///
    /// # Complexity
    ///
    /// O(log n), plus a scan of the equal-key run when values are distinct.
    pub fn insert(&mut self, key: K, value: V) -> bool
    where
        V: PartialEq,
    {
        if self.key_cardinality().allows_duplicates()
            && !self.values.allows_duplicates()
            && self.tree.get_nodes(&key).iter().any(|node| *node.content() == value)
        {
            #[cfg(feature = "tracing")]
            tracing::trace!("insert: rejected equal value under distinct value cardinality");
            return false;
        }

        let inserted = self.tree.add(key, value);
        if inserted {
            self.invalidate();
        }
        inserted
    }

    /// Returns the first value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AbsentKey`] if `key` is not present.
    pub fn get(&self, key: &K) -> Result<&V> {
        self.tree.get_node(key).map(TreeNode::content).ok_or(Error::absent(Relation::EqualTo))
    }

    /// Returns the first value stored under `key`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AbsentKey`] if `key` is not present.
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        self.snapshot.take();
        self.tree.get_content_mut(key).ok_or(Error::absent(Relation::EqualTo))
    }

    /// Returns every value stored under `key`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AbsentKey`] if `key` is not present.
    pub fn get_all(&self, key: &K) -> Result<Vec<&V>> {
        let values: Vec<&V> = self.tree.get_nodes(key).into_iter().map(TreeNode::content).collect();
        if values.is_empty() {
            return Err(Error::absent(Relation::EqualTo));
        }
        Ok(values)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains_key(key)
    }

    /// Removes one entry stored under `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (_, value) = self.tree.remove(key)?;
        self.invalidate();
        Some(value)
    }
}

fn entry<K, V>(node: &Node<K, V>) -> (&K, &V) {
    (node.key(), node.content())
}

impl<K: Clone, V: Clone, C: Clone> Clone for SortedMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            values: self.values,
            snapshot: OnceCell::new(),
        }
    }
}

impl<K, V, C: Default> Default for SortedMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for SortedMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for SortedMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for SortedMap<K, V, C> {}

impl<K, V: PartialEq, C: Comparator<K>> Extend<(K, V)> for SortedMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V: PartialEq, C: Comparator<K> + Default> FromIterator<(K, V)> for SortedMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V: PartialEq, const N: usize> From<[(K, V); N]> for SortedMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a, K, V, C> IntoIterator for &'a SortedMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`SortedMap`], in key order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: sorted_tree::Iter<'a, Node<K, V>>,
}

/// An iterator over the keys of a [`SortedMap`], in order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a [`SortedMap`], in key order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(entry)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}
