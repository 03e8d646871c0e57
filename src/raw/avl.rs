//! Recursive structural edits over owned subtrees.
//!
//! Every function takes a subtree by value and hands back its new root, so
//! rotations can replace a subtree root without parent links. Heights are
//! refreshed and balance restored on the unwind.

use alloc::boxed::Box;
use core::cmp::Ordering;

use super::balance::rebalance;
use crate::node::TreeNode;
use crate::ordering::{Cardinality, Comparator};

/// Inserts `node` into `root`.
///
/// Returns the new subtree root and whether the node was linked in. Under
/// [`Cardinality::Distinct`] an equal key leaves the subtree untouched and
/// drops `node`. Equal keys otherwise descend right, so they stay contiguous
/// in order.
pub(crate) fn insert<N, C>(
    root: Option<Box<N>>,
    node: Box<N>,
    comparator: &C,
    cardinality: Cardinality,
) -> (Box<N>, bool)
where
    N: TreeNode,
    C: Comparator<N::Key>,
{
    let Some(mut current) = root else {
        return (node, true);
    };

    match comparator.compare(node.key(), current.key()) {
        Ordering::Equal if !cardinality.allows_duplicates() => {
            #[cfg(feature = "tracing")]
            tracing::trace!("insert: rejected equal key under distinct cardinality");
            (current, false)
        }
        Ordering::Less => {
            let left = current.set_left(None);
            let (left, inserted) = insert(left, node, comparator, cardinality);
            current.set_left(Some(left));
            if inserted { (rebalance(current), true) } else { (current, false) }
        }
        Ordering::Equal | Ordering::Greater => {
            let right = current.set_right(None);
            let (right, inserted) = insert(right, node, comparator, cardinality);
            current.set_right(Some(right));
            if inserted { (rebalance(current), true) } else { (current, false) }
        }
    }
}

/// Removes one node whose key compares equal to `key`.
///
/// With duplicate keys, the first equal node met on the search path is the
/// one removed.
pub(crate) fn remove<N, C>(
    root: Option<Box<N>>,
    key: &N::Key,
    comparator: &C,
) -> (Option<Box<N>>, Option<(N::Key, N::Content)>)
where
    N: TreeNode,
    C: Comparator<N::Key>,
{
    let Some(mut current) = root else {
        return (None, None);
    };

    let removed = match comparator.compare(key, current.key()) {
        Ordering::Equal => {
            let (subtree, removed) = unlink(current);
            return (subtree, Some(removed));
        }
        Ordering::Less => {
            let (left, removed) = remove(current.set_left(None), key, comparator);
            current.set_left(left);
            removed
        }
        Ordering::Greater => {
            let (right, removed) = remove(current.set_right(None), key, comparator);
            current.set_right(right);
            removed
        }
    };

    if removed.is_some() { (Some(rebalance(current)), removed) } else { (Some(current), None) }
}

/// Removes the node at in-order position `index` of `root`.
///
/// `index` must be less than `root.size()`.
pub(crate) fn remove_at<N: TreeNode>(mut root: Box<N>, index: usize) -> (Option<Box<N>>, (N::Key, N::Content)) {
    let left_size = root.left().map_or(0, TreeNode::size);

    let removed = match index.cmp(&left_size) {
        Ordering::Equal => return unlink(root),
        Ordering::Less => {
            let left = root.set_left(None).expect("`remove_at()` - rank points into a missing left subtree!");
            let (left, removed) = remove_at(left, index);
            root.set_left(left);
            removed
        }
        Ordering::Greater => {
            let right = root.set_right(None).expect("`remove_at()` - rank points past the subtree!");
            let (right, removed) = remove_at(right, index - left_size - 1);
            root.set_right(right);
            removed
        }
    };

    (Some(rebalance(root)), removed)
}

/// Detaches `node` from its position, returning the subtree that takes its
/// place together with the node's key and content.
fn unlink<N: TreeNode>(mut node: Box<N>) -> (Option<Box<N>>, (N::Key, N::Content)) {
    match (node.set_left(None), node.set_right(None)) {
        (None, None) => (None, node.into_parts()),
        (Some(child), None) | (None, Some(child)) => (Some(child), node.into_parts()),
        (Some(left), Some(right)) => {
            // Adopt the payload of the in-order successor, then drop its node.
            let (right, successor) = remove_leftmost(right);
            let (key, content) = successor.into_parts();
            let removed = (node.replace_key(key), node.replace_content(content));
            node.set_left(Some(left));
            node.set_right(right);
            (Some(rebalance(node)), removed)
        }
    }
}

/// Detaches the leftmost descendant of `node`.
///
/// Returns the rebalanced remainder of the subtree and the detached node.
fn remove_leftmost<N: TreeNode>(mut node: Box<N>) -> (Option<Box<N>>, N) {
    match node.set_left(None) {
        None => {
            let right = node.set_right(None);
            (right, *node)
        }
        Some(left) => {
            let (left, leftmost) = remove_leftmost(left);
            node.set_left(left);
            (Some(rebalance(node)), leftmost)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::ordering::NaturalOrder;
    use alloc::vec::Vec;

    type Tree = Option<Box<Node<i32, i32>>>;

    fn build(keys: &[i32], cardinality: Cardinality) -> Tree {
        let mut root: Tree = None;
        for &key in keys {
            let (new_root, _) = insert(root, Box::new(Node::new(key, key * 10)), &NaturalOrder, cardinality);
            root = Some(new_root);
        }
        root
    }

    fn in_order(node: Option<&Node<i32, i32>>, out: &mut Vec<i32>) {
        if let Some(node) = node {
            in_order(node.left(), out);
            out.push(*node.key());
            in_order(node.right(), out);
        }
    }

    fn keys(root: &Tree) -> Vec<i32> {
        let mut out = Vec::new();
        in_order(root.as_deref(), &mut out);
        out
    }

    #[test]
    fn insert_rejects_equal_key_when_distinct() {
        let root = build(&[2, 1, 3], Cardinality::Distinct);
        let (root, inserted) = insert(root, Box::new(Node::new(2, 0)), &NaturalOrder, Cardinality::Distinct);
        assert!(!inserted);
        assert_eq!(root.size(), 3);
    }

    #[test]
    fn insert_keeps_equal_keys_contiguous_when_duplicate() {
        let root = build(&[2, 1, 3, 2, 2, 1], Cardinality::Duplicate);
        assert_eq!(keys(&root), [1, 1, 2, 2, 2, 3]);
    }

    #[test]
    fn ascending_inserts_stay_logarithmic() {
        let input: Vec<i32> = (0..1023).collect();
        let root = build(&input, Cardinality::Distinct);
        // A perfect tree of 1023 nodes has height 10.
        assert_eq!(root.as_ref().unwrap().height(), 10);
    }

    #[test]
    fn remove_two_child_node_adopts_successor_payload() {
        let root = build(&[4, 2, 6, 1, 3, 5, 7], Cardinality::Distinct);
        let (root, removed) = remove(root, &4, &NaturalOrder);
        assert_eq!(removed, Some((4, 40)));
        let root = root.unwrap();
        assert_eq!(*root.key(), 5);
        assert_eq!(*root.content(), 50);
        assert_eq!(keys(&Some(root)), [1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn remove_missing_key_is_a_no_op() {
        let root = build(&[1, 2, 3], Cardinality::Distinct);
        let (root, removed) = remove(root, &9, &NaturalOrder);
        assert!(removed.is_none());
        assert_eq!(keys(&root), [1, 2, 3]);
    }

    #[test]
    fn remove_at_unlinks_by_rank() {
        let root = build(&[10, 20, 30, 40, 50], Cardinality::Distinct).unwrap();
        let (root, removed) = remove_at(root, 3);
        assert_eq!(removed, (40, 400));
        let (root, removed) = remove_at(root.unwrap(), 0);
        assert_eq!(removed, (10, 100));
        assert_eq!(keys(&root), [20, 30, 50]);
    }
}
