//! A chained hash map that shares the crate's error and cardinality model.
//!
//! Every key is routed to the bucket `hash(key) % bucket_count`. Keys that
//! land in the same bucket are kept in a short chain and told apart with
//! [`Eq`]. Missing keys and missing values are modelled with [`Option`], so
//! a `HashBucketMap<Option<K>, Option<V>, S>` can store a "null" key that
//! maps to a "null" value.
//!
//! A `None` key is hashed like any other key, so its bucket depends on the
//! hasher and is not pinned to bucket 0. Lookups hash it the same way, so it
//! is found again after the buckets grow.

use alloc::vec::Vec;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::slice;

use smallvec::SmallVec;

use crate::error::{Error, Relation, Result};
use crate::ordering::Cardinality;

/// Number of buckets a map starts with unless told otherwise.
pub const DEFAULT_BUCKETS: usize = 16;

/// Entries stored inline in a bucket before the chain spills to the heap.
const INLINE_ENTRIES: usize = 2;

type Bucket<K, V> = SmallVec<[(K, V); INLINE_ENTRIES]>;

/// A hash map with separate chaining.
///
/// The map doubles its bucket count once it is more than three quarters
/// full. With [`Cardinality::Duplicate`] one key may be stored several times;
/// [`get_all`](HashBucketMap::get_all) returns every value in insertion
/// order.
///
/// # Examples
///
/// ```
/// use std::hash::RandomState;
/// use osavl_tree::{Error, HashBucketMap, Relation};
///
/// let mut map = HashBucketMap::with_hasher(RandomState::new());
/// assert!(map.insert(Some("answer"), Some(42)));
/// assert!(map.insert(None, None));
///
/// assert_eq!(map.get(&Some("answer")), Ok(&Some(42)));
/// assert_eq!(map.get(&None), Ok(&None));
/// assert_eq!(map.get(&Some("question")), Err(Error::AbsentKey { relation: Relation::EqualTo }));
/// ```
pub struct HashBucketMap<K, V, S> {
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    hasher: S,
    cardinality: Cardinality,
}

impl<K, V, S> HashBucketMap<K, V, S> {
    /// Creates an empty map with distinct keys and [`DEFAULT_BUCKETS`]
    /// buckets.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_policy(DEFAULT_BUCKETS, hasher, Cardinality::Distinct)
    }

    /// Creates an empty map with distinct keys and at least one bucket.
    #[must_use]
    pub fn with_buckets_and_hasher(buckets: usize, hasher: S) -> Self {
        Self::with_policy(buckets, hasher, Cardinality::Distinct)
    }

    /// Creates an empty map with the given initial bucket count, hasher, and
    /// key cardinality.
    #[must_use]
    pub fn with_policy(buckets: usize, hasher: S, cardinality: Cardinality) -> Self {
        Self {
            buckets: empty_buckets(buckets.max(1)),
            len: 0,
            hasher,
            cardinality,
        }
    }

    /// Returns the key cardinality.
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Returns the hasher.
    pub const fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current number of buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Removes every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(SmallVec::clear);
        self.len = 0;
    }

    /// Returns an iterator over the entries, in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: slice::Iter::default(),
            remaining: self.len,
        }
    }
}

impl<K, V, S> HashBucketMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts `value` under `key`.
    ///
    /// Returns `false`, and stores nothing, if the keys are distinct and an
    /// equal key is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if !self.cardinality.allows_duplicates() && self.contains_key(&key) {
            return false;
        }
        self.push(key, value);
        true
    }

    /// Stores `value` under `key`, overwriting the first value already stored
    /// under an equal key.
    ///
    /// Returns the overwritten value, or `None` if a new entry was added.
    pub fn replace(&mut self, key: K, value: V) -> Option<V> {
        if let Ok(slot) = self.get_mut(&key) {
            return Some(core::mem::replace(slot, value));
        }
        self.push(key, value);
        None
    }

    /// Returns the first value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AbsentKey`] if `key` is not present.
    pub fn get(&self, key: &K) -> Result<&V> {
        self.bucket(key)
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
            .ok_or(Error::absent(Relation::EqualTo))
    }

    /// Returns the first value stored under `key`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AbsentKey`] if `key` is not present.
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        let index = self.bucket_index(key);
        self.buckets[index]
            .iter_mut()
            .find_map(|(k, v)| (k == key).then_some(v))
            .ok_or(Error::absent(Relation::EqualTo))
    }

    /// Returns every value stored under `key`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AbsentKey`] if `key` is not present.
    pub fn get_all(&self, key: &K) -> Result<Vec<&V>> {
        let values: Vec<&V> = self.bucket(key).iter().filter(|(k, _)| k == key).map(|(_, v)| v).collect();
        if values.is_empty() {
            return Err(Error::absent(Relation::EqualTo));
        }
        Ok(values)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.bucket(key).iter().any(|(k, _)| k == key)
    }

    /// Removes the first entry stored under `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.bucket_index(key);
        let bucket = &mut self.buckets[index];
        let position = bucket.iter().position(|(k, _)| k == key)?;
        self.len -= 1;
        Some(bucket.remove(position).1)
    }

    fn bucket(&self, key: &K) -> &Bucket<K, V> {
        &self.buckets[self.bucket_index(key)]
    }

    #[allow(clippy::cast_possible_truncation)]
    fn bucket_index(&self, key: &K) -> usize {
        // The remainder is below the bucket count, which fits in `usize`.
        (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize
    }

    fn push(&mut self, key: K, value: V) {
        let index = self.bucket_index(&key);
        self.buckets[index].push((key, value));
        self.len += 1;
        if self.len * 4 > self.buckets.len() * 3 {
            self.grow();
        }
    }

    fn grow(&mut self) {
        let count = self.buckets.len() * 2;
        #[cfg(feature = "tracing")]
        tracing::debug!(len = self.len, from = self.buckets.len(), to = count, "growing hash buckets");

        let old = core::mem::replace(&mut self.buckets, empty_buckets(count));
        for (key, value) in old.into_iter().flatten() {
            let index = self.bucket_index(&key);
            self.buckets[index].push((key, value));
        }
    }
}

fn empty_buckets<K, V>(count: usize) -> Vec<Bucket<K, V>> {
    (0..count).map(|_| SmallVec::new()).collect()
}

impl<K, V, S: Default> Default for HashBucketMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for HashBucketMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            len: self.len,
            hasher: self.hasher.clone(),
            cardinality: self.cardinality,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashBucketMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for HashBucketMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashBucketMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashBucketMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`HashBucketMap`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    buckets: slice::Iter<'a, Bucket<K, V>>,
    chain: slice::Iter<'a, (K, V)>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, value)) = self.chain.next() {
                self.remaining -= 1;
                return Some((key, value));
            }
            self.chain = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            chain: self.chain.clone(),
            remaining: self.remaining,
        }
    }
}
