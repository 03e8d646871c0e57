/// A zero-based rank into the sorted order of a list or map.
///
/// Indexing by `Rank` panics when the rank is out of bounds; the fallible
/// equivalents are [`SortedList::get`](crate::SortedList::get) and
/// [`SortedMap::get_by_rank`](crate::SortedMap::get_by_rank).
///
/// # Examples
///
/// ```
/// use osavl_tree::{Rank, SortedMap};
///
/// let mut map = SortedMap::new();
/// map.insert("b", 20);
/// map.insert("a", 10);
///
/// assert_eq!(map[Rank(0)], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
