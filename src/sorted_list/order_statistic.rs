use core::ops::Index;

use super::SortedList;
use crate::Rank;
use crate::error::Result;
use crate::node::ElementNode;
use crate::ordering::Comparator;

impl<T, C> SortedList<T, C> {
    /// Returns the element at position `index` in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) if
    /// `index >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::{Error, SortedList};
    ///
    /// let list = SortedList::from([10, 20, 30]);
    /// assert_eq!(list.get(1), Ok(&20));
    /// assert_eq!(list.get(3), Err(Error::OutOfBounds { index: 3, len: 3 }));
    /// ```
    pub fn get(&self, index: usize) -> Result<&T> {
        self.tree.get_at(index).map(ElementNode::element)
    }

    /// Removes the element at position `index` in sorted order, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) if
    /// `index >= self.len()`.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let (element, ()) = self.tree.remove_at(index)?;
        self.invalidate();
        Ok(element)
    }
}

impl<T, C: Comparator<T>> SortedList<T, C> {
    /// Returns the rank of an element equal to `value`.
    #[must_use]
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.tree.index_of(value)
    }

    /// Returns the rank of the first element equal to `value`.
    #[must_use]
    pub fn first_index_of(&self, value: &T) -> Option<usize> {
        self.tree.first_index_of(value)
    }

    /// Returns the rank of the last element equal to `value`.
    #[must_use]
    pub fn last_index_of(&self, value: &T) -> Option<usize> {
        self.tree.last_index_of(value)
    }

    /// Returns the least element strictly greater than `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) if the list
    /// is empty and [`Error::AbsentKey`](crate::Error::AbsentKey) if no
    /// element is greater.
    pub fn higher(&self, value: &T) -> Result<&T> {
        self.tree.greater_than(value).map(ElementNode::element)
    }

    /// Returns the least element greater than or equal to `value`.
    ///
    /// # Errors
    ///
    /// See [`higher`](Self::higher).
    pub fn ceiling(&self, value: &T) -> Result<&T> {
        self.tree.greater_than_or_equal(value).map(ElementNode::element)
    }

    /// Returns the greatest element strictly less than `value`.
    ///
    /// # Errors
    ///
    /// See [`higher`](Self::higher).
    pub fn lower(&self, value: &T) -> Result<&T> {
        self.tree.less_than(value).map(ElementNode::element)
    }

    /// Returns the greatest element less than or equal to `value`.
    ///
    /// # Errors
    ///
    /// See [`higher`](Self::higher).
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::SortedList;
    ///
    /// let list = SortedList::from([1, 3]);
    /// assert_eq!(list.floor(&2), Ok(&1));
    /// assert_eq!(list.ceiling(&2), Ok(&3));
    /// ```
    pub fn floor(&self, value: &T) -> Result<&T> {
        self.tree.less_than_or_equal(value).map(ElementNode::element)
    }
}

/// Indexes into the list by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
impl<T, C> Index<Rank> for SortedList<T, C> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get(rank.0).expect("index out of bounds")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::error::{Error, Relation};
    use crate::ordering::Cardinality;
    use crate::{Rank, SortedList};

    #[test]
    fn remove_at_invalidates_snapshot() {
        let mut list = SortedList::from([4, 8, 15, 16, 23, 42]);
        assert_eq!(list.as_slice(), [4, 8, 15, 16, 23, 42]);
        assert_eq!(list.remove_at(2), Ok(15));
        assert_eq!(list.as_slice(), [4, 8, 16, 23, 42]);
        assert_eq!(list.remove_at(5), Err(Error::OutOfBounds { index: 5, len: 5 }));
    }

    #[test]
    fn neighbors_skip_duplicate_runs() {
        let mut list: SortedList<i32> = SortedList::with_cardinality(Cardinality::Duplicate);
        list.extend([2, 2, 2, 7, 7, 9]);
        assert_eq!(list.higher(&2), Ok(&7));
        assert_eq!(list.lower(&7), Ok(&2));
        assert_eq!(list.ceiling(&3), Ok(&7));
        assert_eq!(list.floor(&8), Ok(&7));
        assert_eq!(list.lower(&2), Err(Error::AbsentKey { relation: Relation::LessThan }));
        assert_eq!(list.first_index_of(&7), Some(3));
        assert_eq!(list.last_index_of(&7), Some(4));
        assert_eq!(list[Rank(5)], 9);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn index_past_end_panics() {
        let list = SortedList::from([1]);
        let _ = &list[Rank(1)];
    }
}
