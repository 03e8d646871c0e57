use core::cmp::Ordering;

use super::SortedTree;
use crate::error::{Error, Relation, Result};
use crate::node::TreeNode;
use crate::ordering::Comparator;

impl<N, C> SortedTree<N, C>
where
    N: TreeNode,
    C: Comparator<N::Key>,
{
    /// Returns the node with the smallest key strictly greater than `probe`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the tree is empty, and
    /// [`Error::AbsentKey`] if no key exceeds `probe`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::{Error, Node, Relation, SortedTree, TreeNode};
    ///
    /// let tree: SortedTree<Node<i32, ()>> = [(1, ()), (2, ()), (3, ())].into_iter().collect();
    /// assert_eq!(*tree.greater_than(&1).unwrap().key(), 2);
    /// assert_eq!(tree.greater_than(&3).unwrap_err(), Error::AbsentKey { relation: Relation::GreaterThan });
    /// ```
    pub fn greater_than(&self, probe: &N::Key) -> Result<&N> {
        self.neighbor(probe, Relation::GreaterThan)
    }

    /// Returns the node with the smallest key greater than or equal to `probe`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the tree is empty, and
    /// [`Error::AbsentKey`] if every key is less than `probe`.
    pub fn greater_than_or_equal(&self, probe: &N::Key) -> Result<&N> {
        self.neighbor(probe, Relation::GreaterThanOrEqualTo)
    }

    /// Returns the node with the largest key strictly less than `probe`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the tree is empty, and
    /// [`Error::AbsentKey`] if no key precedes `probe`.
    pub fn less_than(&self, probe: &N::Key) -> Result<&N> {
        self.neighbor(probe, Relation::LessThan)
    }

    /// Returns the node with the largest key less than or equal to `probe`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the tree is empty, and
    /// [`Error::AbsentKey`] if every key is greater than `probe`.
    pub fn less_than_or_equal(&self, probe: &N::Key) -> Result<&N> {
        self.neighbor(probe, Relation::LessThanOrEqualTo)
    }

    /// Descends from the root, keeping the closest qualifying node seen so far.
    ///
    /// `relation` must be one of the four ordering relations.
    fn neighbor(&self, probe: &N::Key, relation: Relation) -> Result<&N> {
        let mut current = Some(self.root.as_deref().ok_or(Error::empty())?);
        let mut best = None;

        while let Some(node) = current {
            let ordering = self.comparator.compare(node.key(), probe);
            current = match (relation, ordering) {
                (Relation::GreaterThanOrEqualTo | Relation::LessThanOrEqualTo, Ordering::Equal) => return Ok(node),
                (Relation::GreaterThan | Relation::GreaterThanOrEqualTo, Ordering::Greater) => {
                    best = Some(node);
                    node.left()
                }
                (Relation::GreaterThan | Relation::GreaterThanOrEqualTo, _) => node.right(),
                (Relation::LessThan | Relation::LessThanOrEqualTo, Ordering::Less) => {
                    best = Some(node);
                    node.right()
                }
                (Relation::LessThan | Relation::LessThanOrEqualTo, _) => node.left(),
                (Relation::EqualTo, _) => unreachable!("`neighbor()` - exact lookups go through `get_node()`!"),
            };
        }

        best.ok_or(Error::absent(relation))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::collections::BTreeSet;
    use core::ops::Bound::{Excluded, Included, Unbounded};

    use crate::error::{Error, Relation};
    use crate::node::{Node, TreeNode};
    use crate::ordering::Cardinality;
    use crate::sorted_tree::SortedTree;
    use proptest::prelude::*;

    fn tree_of(keys: &[i32]) -> SortedTree<Node<i32, ()>> {
        keys.iter().map(|&k| (k, ())).collect()
    }

    #[test]
    fn or_equal_variants_bracket_a_gap() {
        let tree = tree_of(&[1, 3]);
        assert_eq!(*tree.greater_than_or_equal(&2).unwrap().key(), 3);
        assert_eq!(*tree.less_than_or_equal(&2).unwrap().key(), 1);
        assert_eq!(*tree.greater_than_or_equal(&3).unwrap().key(), 3);
        assert_eq!(*tree.less_than_or_equal(&1).unwrap().key(), 1);
    }

    #[test]
    fn empty_tree_reports_out_of_bounds() {
        let tree = tree_of(&[]);
        let results = [
            tree.greater_than(&0),
            tree.greater_than_or_equal(&0),
            tree.less_than(&0),
            tree.less_than_or_equal(&0),
        ];
        for result in results {
            assert_eq!(result.unwrap_err(), Error::OutOfBounds { index: 0, len: 0 });
        }
    }

    #[test]
    fn extremes_report_absent_key() {
        let tree = tree_of(&[1, 2, 3]);
        assert_eq!(tree.greater_than(&3).unwrap_err(), Error::AbsentKey { relation: Relation::GreaterThan });
        assert_eq!(tree.less_than(&1).unwrap_err(), Error::AbsentKey { relation: Relation::LessThan });
        assert_eq!(
            tree.greater_than_or_equal(&4).unwrap_err(),
            Error::AbsentKey { relation: Relation::GreaterThanOrEqualTo }
        );
        assert_eq!(
            tree.less_than_or_equal(&0).unwrap_err(),
            Error::AbsentKey { relation: Relation::LessThanOrEqualTo }
        );
    }

    #[test]
    #[should_panic(expected = "exact lookups")]
    fn neighbor_rejects_exact_relation() {
        let tree = tree_of(&[1, 2, 3]);
        let _ = tree.neighbor(&2, Relation::EqualTo);
    }

    #[test]
    fn strict_variants_skip_equal_duplicates() {
        let mut tree: SortedTree<Node<i32, ()>> = SortedTree::with_cardinality(Cardinality::Duplicate);
        for key in [5, 5, 5, 1, 9, 5] {
            tree.add(key, ());
        }
        assert_eq!(*tree.greater_than(&5).unwrap().key(), 9);
        assert_eq!(*tree.less_than(&5).unwrap().key(), 1);
    }

    proptest! {
        #[test]
        fn neighbors_match_btreeset(keys in prop::collection::btree_set(-100i32..100, 1..100), probe in -110i32..110) {
            let tree = tree_of(&keys.iter().copied().collect::<alloc::vec::Vec<_>>());
            let model: &BTreeSet<i32> = &keys;

            let gt = model.range((Excluded(probe), Unbounded)).next().copied();
            let ge = model.range((Included(probe), Unbounded)).next().copied();
            let lt = model.range((Unbounded, Excluded(probe))).next_back().copied();
            let le = model.range((Unbounded, Included(probe))).next_back().copied();

            prop_assert_eq!(tree.greater_than(&probe).ok().map(|n| *n.key()), gt);
            prop_assert_eq!(tree.greater_than_or_equal(&probe).ok().map(|n| *n.key()), ge);
            prop_assert_eq!(tree.less_than(&probe).ok().map(|n| *n.key()), lt);
            prop_assert_eq!(tree.less_than_or_equal(&probe).ok().map(|n| *n.key()), le);
        }
    }
}
