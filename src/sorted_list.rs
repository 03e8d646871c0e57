use alloc::vec::Vec;
use core::cell::OnceCell;
use core::fmt;
use core::iter::FusedIterator;

use crate::node::ElementNode;
use crate::ordering::{Cardinality, Comparator, NaturalOrder};
use crate::sorted_tree::{self, SortedTree};

mod order_statistic;

/// A sorted collection backed by an AVL [`SortedTree`].
///
/// Elements are kept in the order defined by the comparator `C`. With
/// [`Cardinality::Duplicate`] equal elements are stored side by side; with
/// the default [`Cardinality::Distinct`] inserting an equal element is
/// rejected.
///
/// [`as_slice`](SortedList::as_slice) exposes the elements as a contiguous
/// slice. The slice is built on first use and dropped by any mutation, so
/// repeated reads between writes cost a single traversal.
///
/// # Examples
///
/// ```
/// use osavl_tree::SortedList;
///
/// let mut books = SortedList::new();
/// books.insert("The Odyssey");
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
///
/// assert!(!books.insert("The Odyssey"));
/// assert_eq!(books.as_slice(), ["A Dance With Dragons", "The Odyssey", "To Kill a Mockingbird"]);
///
/// books.remove(&"The Odyssey");
/// assert_eq!(books.as_slice(), ["A Dance With Dragons", "To Kill a Mockingbird"]);
/// ```
pub struct SortedList<T, C = NaturalOrder> {
    tree: SortedTree<ElementNode<T>, C>,
    snapshot: OnceCell<Vec<T>>,
}

/// An iterator over the elements of a [`SortedList`], in sorted order.
///
/// This `struct` is created by the [`iter`](SortedList::iter) method on
/// [`SortedList`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: sorted_tree::Iter<'a, ElementNode<T>>,
}

impl<T> SortedList<T> {
    /// Creates an empty list of distinct elements in natural order.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_policy(NaturalOrder, Cardinality::Distinct)
    }

    /// Creates an empty list in natural order with the given element
    /// cardinality.
    #[must_use]
    pub const fn with_cardinality(cardinality: Cardinality) -> Self {
        Self::with_policy(NaturalOrder, cardinality)
    }
}

impl<T, C> SortedList<T, C> {
    /// Creates an empty list of distinct elements ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::SortedList;
    ///
    /// let mut list = SortedList::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// list.extend([1, 3, 2]);
    /// assert_eq!(list.as_slice(), [3, 2, 1]);
    /// ```
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self::with_policy(comparator, Cardinality::Distinct)
    }

    /// Creates an empty list ordered by `comparator` with the given element
    /// cardinality.
    #[must_use]
    pub const fn with_policy(comparator: C, cardinality: Cardinality) -> Self {
        Self {
            tree: SortedTree::with_policy(comparator, cardinality),
            snapshot: OnceCell::new(),
        }
    }

    /// Returns the element cardinality.
    pub const fn cardinality(&self) -> Cardinality {
        self.tree.cardinality()
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the list holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.invalidate();
        self.tree.clear();
    }

    /// Returns the underlying tree for read-only inspection.
    pub const fn tree(&self) -> &SortedTree<ElementNode<T>, C> {
        &self.tree
    }

    /// Returns the smallest element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first().map(ElementNode::element)
    }

    /// Returns the largest element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last().map(ElementNode::element)
    }

    /// Returns an iterator over the elements in sorted order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.tree.iter() }
    }

    /// Returns the elements in sorted order as a slice.
    ///
    /// The slice is cached until the next mutation.
    ///
    /// # Complexity
    ///
    /// O(n) on the first call after a mutation, O(1) afterwards.
    pub fn as_slice(&self) -> &[T]
    where
        T: Clone,
    {
        self.snapshot.get_or_init(|| self.iter().cloned().collect())
    }

    fn invalidate(&mut self) {
        self.snapshot.take();
    }
}

impl<T, C: Comparator<T>> SortedList<T, C> {
    /// Inserts `value`.
    ///
    /// Returns `false` if the list holds distinct elements and an equal one is
    /// already present.
    pub fn insert(&mut self, value: T) -> bool {
        let inserted = self.tree.add(value, ());
        if inserted {
            self.invalidate();
        }
        inserted
    }

    /// Removes an element equal to `value`, returning it.
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let (removed, ()) = self.tree.remove(value)?;
        self.invalidate();
        Some(removed)
    }

    /// Returns `true` if an element equal to `value` is present.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains_key(value)
    }

    /// Returns the number of elements equal to `value`.
    #[must_use]
    pub fn count(&self, value: &T) -> usize {
        self.tree.get_nodes(value).len()
    }
}

impl<T, C: Clone> Clone for SortedList<T, C>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            snapshot: OnceCell::new(),
        }
    }
}

impl<T, C: Default> Default for SortedList<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SortedList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for SortedList<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for SortedList<T, C> {}

impl<T, C: Comparator<T>> Extend<T> for SortedList<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C: Comparator<T> + Default> FromIterator<T> for SortedList<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::default();
        list.extend(iter);
        list
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for SortedList<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T, C> IntoIterator for &'a SortedList<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(ElementNode::element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(ElementNode::element)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Iter<'_, T> {
    fn default() -> Self {
        Self {
            inner: sorted_tree::Iter::default(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    // The snapshot cell is single-threaded.
    assert_impl_all!(SortedList<i32>: Send);
    assert_not_impl_any!(SortedList<i32>: Sync);

    #[test]
    fn snapshot_is_reused_until_mutation() {
        let mut list: SortedList<i32> = SortedList::from([3, 1, 2]);
        let first = list.as_slice().as_ptr();
        assert_eq!(list.as_slice().as_ptr(), first);
        assert_eq!(list.as_slice(), [1, 2, 3]);

        assert!(!list.insert(2));
        assert!(list.snapshot.get().is_some(), "rejected insert keeps the snapshot");

        list.insert(0);
        assert!(list.snapshot.get().is_none());
        assert_eq!(list.as_slice(), [0, 1, 2, 3]);

        assert_eq!(list.remove(&9), None);
        assert!(list.snapshot.get().is_some(), "missed remove keeps the snapshot");
        assert_eq!(list.remove(&1), Some(1));
        assert_eq!(list.as_slice(), [0, 2, 3]);
    }

    #[test]
    fn clear_drops_the_snapshot() {
        let mut list: SortedList<i32> = SortedList::from([1, 2]);
        assert_eq!(list.as_slice(), [1, 2]);
        list.clear();
        assert!(list.as_slice().is_empty());
        assert!(list.is_empty());
    }

    #[test]
    fn duplicates_are_counted() {
        let mut list: SortedList<char> = SortedList::with_cardinality(Cardinality::Duplicate);
        list.extend("mississippi".chars());
        assert_eq!(list.len(), 11);
        assert_eq!(list.count(&'s'), 4);
        assert_eq!(list.count(&'z'), 0);
        assert_eq!(list.iter().collect::<alloc::string::String>(), "iiiimppssss");
    }
}
