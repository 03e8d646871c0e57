use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use crate::node::TreeNode;
use crate::ordering::{Cardinality, Comparator, NaturalOrder};
use crate::raw::{RawIter, avl};

mod neighbors;
mod order_statistic;

/// A height-balanced (AVL) binary search tree with rank access.
///
/// `SortedTree` is the engine behind [`SortedList`](crate::SortedList) and
/// [`SortedMap`](crate::SortedMap). It is generic over the node type, so the
/// same engine drives both the key/content [`Node`](crate::Node) and the
/// element-only [`ElementNode`](crate::ElementNode).
///
/// Keys are ordered by the comparator `C`; every comparison the tree makes
/// goes through it. The [`Cardinality`] decides whether equal keys may be
/// stored side by side.
///
/// After every public mutation the heights of a node's two subtrees differ by
/// at most one, so lookups, insertions, and removals by key take O(log n)
/// comparisons. Positional queries derive subtree sizes by traversal.
///
/// # Examples
///
/// ```
/// use osavl_tree::{Node, SortedTree, TreeNode};
///
/// let mut tree: SortedTree<Node<i32, &str>> = SortedTree::new();
/// tree.add(5, "five");
/// tree.add(1, "one");
/// tree.add(3, "three");
/// tree.add(2, "two");
///
/// let keys: Vec<i32> = tree.iter().map(|node| *node.key()).collect();
/// assert_eq!(keys, [1, 2, 3, 5]);
///
/// assert_eq!(*tree.get_at(1).unwrap().content(), "two");
/// assert_eq!(tree.index_of(&5), Some(3));
/// assert_eq!(*tree.greater_than(&3).unwrap().key(), 5);
/// ```
pub struct SortedTree<N, C = NaturalOrder> {
    root: Option<Box<N>>,
    len: usize,
    comparator: C,
    cardinality: Cardinality,
}

/// An in-order iterator over the nodes of a [`SortedTree`].
///
/// This `struct` is created by the [`iter`](SortedTree::iter) method on
/// [`SortedTree`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, N> {
    raw: RawIter<'a, N>,
}

impl<N, C: Default> SortedTree<N, C> {
    /// Creates an empty tree with distinct keys and a default comparator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(C::default(), Cardinality::Distinct)
    }

    /// Creates an empty tree with a default comparator and the given key
    /// cardinality.
    #[must_use]
    pub fn with_cardinality(cardinality: Cardinality) -> Self {
        Self::with_policy(C::default(), cardinality)
    }
}

impl<N, C> SortedTree<N, C> {
    /// Creates an empty tree with distinct keys ordered by `comparator`.
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self::with_policy(comparator, Cardinality::Distinct)
    }

    /// Creates an empty tree ordered by `comparator` with the given key
    /// cardinality.
    #[must_use]
    pub const fn with_policy(comparator: C, cardinality: Cardinality) -> Self {
        Self {
            root: None,
            len: 0,
            comparator,
            cardinality,
        }
    }

    /// Returns the comparator.
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the key cardinality.
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Returns the number of nodes in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }
}

impl<N: TreeNode, C> SortedTree<N, C> {
    /// Returns the root node, if any, for read-only traversal.
    ///
    /// Bulk extraction (for example building an ordered array) can walk the
    /// tree from here without going through the rank queries.
    #[must_use]
    pub fn root_node(&self) -> Option<&N> {
        self.root.as_deref()
    }

    /// Returns the height of the tree, 0 when empty.
    #[must_use]
    pub fn height(&self) -> usize {
        self.root.as_deref().map_or(0, TreeNode::height)
    }

    /// Returns the node with the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<&N> {
        self.root.as_deref().map(TreeNode::leftmost)
    }

    /// Returns the node with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<&N> {
        self.root.as_deref().map(TreeNode::rightmost)
    }

    /// Returns an in-order iterator over the nodes.
    pub fn iter(&self) -> Iter<'_, N> {
        Iter {
            raw: RawIter::new(self.root.as_deref(), self.len),
        }
    }

    /// Removes every node, returning the keys and contents in order.
    pub fn drain_to_vec(&mut self) -> Vec<(N::Key, N::Content)> {
        fn drain<N: TreeNode>(node: Option<Box<N>>, out: &mut Vec<(N::Key, N::Content)>) {
            if let Some(mut node) = node {
                let right = node.set_right(None);
                drain(node.set_left(None), out);
                out.push(node.into_parts());
                drain(right, out);
            }
        }

        let mut out = Vec::with_capacity(self.len);
        drain(self.root.take(), &mut out);
        self.len = 0;
        out
    }
}

impl<N, C> SortedTree<N, C>
where
    N: TreeNode,
    C: Comparator<N::Key>,
{
    /// Inserts `key` with `content`.
    ///
    /// Returns `false`, and stores nothing, if the tree has distinct keys and
    /// an equal key is already present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn add(&mut self, key: N::Key, content: N::Content) -> bool {
        let node = Box::new(N::from_parts(key, content));
        let (root, inserted) = avl::insert(self.root.take(), node, &self.comparator, self.cardinality);
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes a node whose key equals `key`, returning its key and content.
    ///
    /// When duplicate keys are stored, which of the equal nodes is removed is
    /// unspecified.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, key: &N::Key) -> Option<(N::Key, N::Content)> {
        let (root, removed) = avl::remove(self.root.take(), key, &self.comparator);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Returns `true` if a node with a key equal to `key` exists.
    #[must_use]
    pub fn contains_key(&self, key: &N::Key) -> bool {
        self.get_node(key).is_some()
    }

    /// Returns the first node, in order, whose key equals `key`.
    #[must_use]
    pub fn get_node(&self, key: &N::Key) -> Option<&N> {
        let mut current = self.root.as_deref();
        let mut found = None;
        while let Some(node) = current {
            current = match self.comparator.compare(key, node.key()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => {
                    found = Some(node);
                    node.left()
                }
            };
        }
        found
    }

    /// Returns the content of the first node, in order, whose key equals
    /// `key`, mutably.
    ///
    /// Only the content is exposed; the key cannot be changed in place.
    pub fn get_content_mut(&mut self, key: &N::Key) -> Option<&mut N::Content> {
        let index = self.first_index_of(key)?;
        self.get_content_mut_at(index).ok()
    }

    /// Returns every node whose key equals `key`, in order.
    #[must_use]
    pub fn get_nodes(&self, key: &N::Key) -> Vec<&N> {
        fn collect<'a, N, C>(node: Option<&'a N>, key: &N::Key, comparator: &C, out: &mut Vec<&'a N>)
        where
            N: TreeNode,
            C: Comparator<N::Key>,
        {
            let Some(node) = node else {
                return;
            };
            match comparator.compare(key, node.key()) {
                Ordering::Less => collect(node.left(), key, comparator, out),
                Ordering::Greater => collect(node.right(), key, comparator, out),
                Ordering::Equal => {
                    collect(node.left(), key, comparator, out);
                    out.push(node);
                    collect(node.right(), key, comparator, out);
                }
            }
        }

        let mut out = Vec::new();
        collect(self.root.as_deref(), key, &self.comparator, &mut out);
        out
    }
}

impl<N: TreeNode + Clone, C: Clone> Clone for SortedTree<N, C> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
            comparator: self.comparator.clone(),
            cardinality: self.cardinality,
        }
    }
}

impl<N, C: Default> Default for SortedTree<N, C> {
    fn default() -> Self {
        Self::with_policy(C::default(), Cardinality::Distinct)
    }
}

impl<N, C> fmt::Debug for SortedTree<N, C>
where
    N: TreeNode,
    N::Key: fmt::Debug,
    N::Content: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|node| (node.key(), node.content()))).finish()
    }
}

impl<N, C> Extend<(N::Key, N::Content)> for SortedTree<N, C>
where
    N: TreeNode,
    C: Comparator<N::Key>,
{
    fn extend<I: IntoIterator<Item = (N::Key, N::Content)>>(&mut self, iter: I) {
        for (key, content) in iter {
            self.add(key, content);
        }
    }
}

impl<N, C> FromIterator<(N::Key, N::Content)> for SortedTree<N, C>
where
    N: TreeNode,
    C: Comparator<N::Key> + Default,
{
    fn from_iter<I: IntoIterator<Item = (N::Key, N::Content)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<N, C, const LEN: usize> From<[(N::Key, N::Content); LEN]> for SortedTree<N, C>
where
    N: TreeNode,
    C: Comparator<N::Key> + Default,
{
    fn from(entries: [(N::Key, N::Content); LEN]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a, N: TreeNode, C> IntoIterator for &'a SortedTree<N, C> {
    type Item = &'a N;
    type IntoIter = Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, N: TreeNode> Iterator for Iter<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.raw.len(), Some(self.raw.len()))
    }
}

impl<N: TreeNode> DoubleEndedIterator for Iter<'_, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.raw.next_back()
    }
}

impl<N: TreeNode> ExactSizeIterator for Iter<'_, N> {
    fn len(&self) -> usize {
        self.raw.len()
    }
}

impl<N: TreeNode> FusedIterator for Iter<'_, N> {}

impl<N> Clone for Iter<'_, N> {
    fn clone(&self) -> Self {
        Self { raw: self.raw.clone() }
    }
}

impl<N> Default for Iter<'_, N> {
    fn default() -> Self {
        Self { raw: RawIter::empty() }
    }
}

impl<N: TreeNode + fmt::Debug> fmt::Debug for Iter<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut remaining = self.raw.clone();
        f.debug_list().entries(core::iter::from_fn(move || remaining.next())).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
mod tests {
    use super::*;
    use crate::node::Node;
    use alloc::format;
    use alloc::string::String;
    use proptest::prelude::*;

    impl<N, C> SortedTree<N, C>
    where
        N: TreeNode,
        C: Comparator<N::Key>,
    {
        /// Validates every structural invariant. Panics with a descriptive
        /// message if any is violated.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let size = self.validate_node(self.root.as_deref(), &mut errors);
            if size != self.len {
                errors.push(format!("len mismatch: self.len={}, actual count={size}", self.len));
            }

            let mut iter = self.iter();
            if let Some(mut previous) = iter.next() {
                for node in iter {
                    match self.comparator.compare(previous.key(), node.key()) {
                        Ordering::Greater => errors.push("in-order keys not sorted".into()),
                        Ordering::Equal if !self.cardinality.allows_duplicates() => {
                            errors.push("equal keys stored under distinct cardinality".into());
                        }
                        _ => {}
                    }
                    previous = node;
                }
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns the subtree size, checking heights and balance on the way.
        fn validate_node(&self, node: Option<&N>, errors: &mut Vec<String>) -> usize {
            let Some(node) = node else {
                return 0;
            };
            let left = self.validate_node(node.left(), errors);
            let right = self.validate_node(node.right(), errors);

            if node.size() != 1 + left + right {
                errors.push(format!("size mismatch: {} != 1 + {left} + {right}", node.size()));
            }
            let expected_height = 1 + node.left().map_or(0, N::height).max(node.right().map_or(0, N::height));
            if node.height() != expected_height {
                errors.push(format!("stale height: cached={}, actual={expected_height}", node.height()));
            }
            if node.balance_factor().abs() > 1 {
                errors.push(format!("unbalanced node: balance factor {}", node.balance_factor()));
            }
            1 + left + right
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add(i32),
        Remove(i32),
        RemoveAt(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0i32..200).prop_map(Op::Add),
            2 => (0i32..200).prop_map(Op::Remove),
            1 => any::<usize>().prop_map(Op::RemoveAt),
        ]
    }

    fn run(ops: &[Op], cardinality: Cardinality) -> Result<(), TestCaseError> {
        let mut tree: SortedTree<Node<i32, i32>> = SortedTree::with_cardinality(cardinality);
        let mut model: Vec<i32> = Vec::new();

        for op in ops {
            match *op {
                Op::Add(key) => {
                    let position = model.partition_point(|&k| k <= key);
                    let expected = cardinality.allows_duplicates() || !model.contains(&key);
                    prop_assert_eq!(tree.add(key, -key), expected);
                    if expected {
                        model.insert(position, key);
                    }
                }
                Op::Remove(key) => {
                    let removed = tree.remove(&key);
                    match model.iter().position(|&k| k == key) {
                        Some(position) => {
                            prop_assert_eq!(removed, Some((key, -key)));
                            model.remove(position);
                        }
                        None => prop_assert!(removed.is_none()),
                    }
                }
                Op::RemoveAt(which) => {
                    if model.is_empty() {
                        prop_assert!(tree.remove_at(which).is_err());
                        continue;
                    }
                    let index = which % model.len();
                    let (key, _) = tree.remove_at(index).unwrap();
                    prop_assert_eq!(key, model.remove(index));
                }
            }
            tree.validate_invariants();
            prop_assert_eq!(tree.len(), model.len());
        }

        let keys: Vec<i32> = tree.iter().map(|n| *n.key()).collect();
        prop_assert_eq!(keys, model);
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn invariants_hold_with_distinct_keys(ops in prop::collection::vec(op_strategy(), 0..300)) {
            run(&ops, Cardinality::Distinct)?;
        }

        #[test]
        fn invariants_hold_with_duplicate_keys(ops in prop::collection::vec(op_strategy(), 0..300)) {
            run(&ops, Cardinality::Duplicate)?;
        }

        #[test]
        fn insert_then_remove_everything_empties_the_tree(
            keys in Just((1..=200).collect::<Vec<i32>>()).prop_shuffle(),
        ) {
            let mut tree: SortedTree<Node<i32, ()>> = (1..=200).map(|k| (k, ())).collect();
            tree.validate_invariants();
            for key in keys {
                prop_assert!(tree.remove(&key).is_some());
                tree.validate_invariants();
            }
            prop_assert!(tree.is_empty());
            prop_assert!(tree.root_node().is_none());
        }
    }

    #[test]
    fn get_nodes_returns_every_equal_key() {
        let mut tree: SortedTree<Node<i32, char>> = SortedTree::with_cardinality(Cardinality::Duplicate);
        for (key, content) in [(2, 'a'), (1, 'b'), (2, 'c'), (3, 'd'), (2, 'e')] {
            tree.add(key, content);
        }
        let mut contents: Vec<char> = tree.get_nodes(&2).into_iter().map(|n| *n.content()).collect();
        contents.sort_unstable();
        assert_eq!(contents, ['a', 'c', 'e']);
        assert!(tree.get_nodes(&9).is_empty());
    }

    #[test]
    fn drain_to_vec_returns_sorted_entries() {
        let mut tree: SortedTree<Node<i32, i32>> = SortedTree::from([(3, 30), (1, 10), (2, 20)]);
        assert_eq!(tree.drain_to_vec(), [(1, 10), (2, 20), (3, 30)]);
        assert!(tree.is_empty());
        tree.validate_invariants();
    }

    #[test]
    fn debug_lists_entries_in_order() {
        let tree: SortedTree<Node<i32, &str>> = [(2, "b"), (1, "a")].into_iter().collect();
        assert_eq!(format!("{tree:?}"), r#"{1: "a", 2: "b"}"#);
    }
}
