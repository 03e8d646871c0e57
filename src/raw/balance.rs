use alloc::boxed::Box;

use crate::node::TreeNode;

/// Rotates `node` to the left: its right child becomes the subtree root.
///
/// Heights of the two nodes whose children change are refreshed; every
/// other node keeps its (already correct) height.
pub(crate) fn rotate_left<N: TreeNode>(mut node: Box<N>) -> Box<N> {
    let mut pivot = node.set_right(None).expect("`rotate_left()` - `node` has no right child!");
    node.set_right(pivot.set_left(None));
    node.update_height();
    pivot.set_left(Some(node));
    pivot.update_height();
    pivot
}

/// Rotates `node` to the right: its left child becomes the subtree root.
pub(crate) fn rotate_right<N: TreeNode>(mut node: Box<N>) -> Box<N> {
    let mut pivot = node.set_left(None).expect("`rotate_right()` - `node` has no left child!");
    node.set_left(pivot.set_right(None));
    node.update_height();
    pivot.set_right(Some(node));
    pivot.update_height();
    pivot
}

/// Refreshes the height of `node` and restores the AVL invariant at it.
///
/// Both subtrees must already be balanced with correct heights, which holds
/// on the unwind of every insert and remove. Returns the new subtree root.
pub(crate) fn rebalance<N: TreeNode>(mut node: Box<N>) -> Box<N> {
    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        let right = node.set_right(None).expect("`rebalance()` - right-heavy node has no right child!");
        let right = if right.balance_factor() < 0 {
            #[cfg(feature = "tracing")]
            tracing::trace!(balance, "rebalance: right-left rotation");
            rotate_right(right)
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(balance, "rebalance: left rotation");
            right
        };
        node.set_right(Some(right));
        rotate_left(node)
    } else if balance < -1 {
        let left = node.set_left(None).expect("`rebalance()` - left-heavy node has no left child!");
        let left = if left.balance_factor() > 0 {
            #[cfg(feature = "tracing")]
            tracing::trace!(balance, "rebalance: left-right rotation");
            rotate_left(left)
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(balance, "rebalance: right rotation");
            left
        };
        node.set_left(Some(left));
        rotate_right(node)
    } else {
        node
    }
}
