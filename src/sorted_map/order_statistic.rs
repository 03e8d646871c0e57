use core::ops::{Index, IndexMut};

use super::{SortedMap, entry};
use crate::Rank;
use crate::error::Result;
use crate::ordering::Comparator;

impl<K, V, C> SortedMap<K, V, C> {
    /// Returns the entry at position `rank` in key order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) if
    /// `rank >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::SortedMap;
    ///
    /// let map = SortedMap::from([(3, 'c'), (1, 'a'), (2, 'b')]);
    /// assert_eq!(map.get_by_rank(1), Ok((&2, &'b')));
    /// assert!(map.get_by_rank(3).is_err());
    /// ```
    pub fn get_by_rank(&self, rank: usize) -> Result<(&K, &V)> {
        self.tree.get_at(rank).map(entry)
    }

    /// Returns the value at position `rank` in key order, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) if
    /// `rank >= self.len()`.
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Result<&mut V> {
        self.invalidate();
        self.tree.get_content_mut_at(rank)
    }

    /// Removes the entry at position `rank` in key order, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) if
    /// `rank >= self.len()`.
    pub fn remove_at(&mut self, rank: usize) -> Result<(K, V)> {
        let removed = self.tree.remove_at(rank)?;
        self.invalidate();
        Ok(removed)
    }
}

impl<K, V, C: Comparator<K>> SortedMap<K, V, C> {
    /// Returns the rank of an entry whose key equals `key`.
    #[must_use]
    pub fn rank_of(&self, key: &K) -> Option<usize> {
        self.tree.index_of(key)
    }

    /// Returns the rank of the first entry whose key equals `key`.
    #[must_use]
    pub fn first_rank_of(&self, key: &K) -> Option<usize> {
        self.tree.first_index_of(key)
    }

    /// Returns the rank of the last entry whose key equals `key`.
    #[must_use]
    pub fn last_rank_of(&self, key: &K) -> Option<usize> {
        self.tree.last_index_of(key)
    }

    /// Returns the entry with the least key strictly greater than `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) if the map is
    /// empty and [`Error::AbsentKey`](crate::Error::AbsentKey) if no key is
    /// greater.
    pub fn higher_entry(&self, key: &K) -> Result<(&K, &V)> {
        self.tree.greater_than(key).map(entry)
    }

    /// Returns the entry with the least key greater than or equal to `key`.
    ///
    /// # Errors
    ///
    /// See [`higher_entry`](Self::higher_entry).
    pub fn ceiling_entry(&self, key: &K) -> Result<(&K, &V)> {
        self.tree.greater_than_or_equal(key).map(entry)
    }

    /// Returns the entry with the greatest key strictly less than `key`.
    ///
    /// # Errors
    ///
    /// See [`higher_entry`](Self::higher_entry).
    pub fn lower_entry(&self, key: &K) -> Result<(&K, &V)> {
        self.tree.less_than(key).map(entry)
    }

    /// Returns the entry with the greatest key less than or equal to `key`.
    ///
    /// # Errors
    ///
    /// See [`higher_entry`](Self::higher_entry).
    pub fn floor_entry(&self, key: &K) -> Result<(&K, &V)> {
        self.tree.less_than_or_equal(key).map(entry)
    }
}

/// Indexes into the map's values by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
impl<K, V, C> Index<Rank> for SortedMap<K, V, C> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).map(|(_, value)| value).expect("index out of bounds")
    }
}

/// Mutably indexes into the map's values by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
impl<K, V, C> IndexMut<Rank> for SortedMap<K, V, C> {
    fn index_mut(&mut self, rank: Rank) -> &mut Self::Output {
        self.get_by_rank_mut(rank.0).expect("index out of bounds")
    }
}
