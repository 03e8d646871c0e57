use smallvec::SmallVec;

use crate::node::TreeNode;

// An AVL tree of height 64 holds more nodes than fit in memory, so the stacks
// never spill to the heap in practice. `smallvec` only accepts certain inline
// sizes; 64 is one of them.
const STACK_DEPTH: usize = 64;

type Stack<'a, N> = SmallVec<[&'a N; STACK_DEPTH]>;

/// A double-ended in-order traversal over borrowed nodes.
///
/// The front stack walks left spines, the back stack walks right spines, and
/// `remaining` keeps the two ends from crossing.
pub(crate) struct RawIter<'a, N> {
    front: Stack<'a, N>,
    back: Stack<'a, N>,
    remaining: usize,
}

impl<'a, N: TreeNode> RawIter<'a, N> {
    /// Creates an iterator over the subtree rooted at `root`, which holds `len` nodes.
    pub(crate) fn new(root: Option<&'a N>, len: usize) -> Self {
        let mut iter = Self {
            front: SmallVec::new(),
            back: SmallVec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter.push_right_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a N>) {
        while let Some(current) = node {
            self.front.push(current);
            node = current.left();
        }
    }

    fn push_right_spine(&mut self, mut node: Option<&'a N>) {
        while let Some(current) = node {
            self.back.push(current);
            node = current.right();
        }
    }

    pub(crate) fn next(&mut self) -> Option<&'a N> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        self.push_left_spine(node.right());
        self.remaining -= 1;
        Some(node)
    }

    pub(crate) fn next_back(&mut self) -> Option<&'a N> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.pop()?;
        self.push_right_spine(node.left());
        self.remaining -= 1;
        Some(node)
    }

    pub(crate) const fn len(&self) -> usize {
        self.remaining
    }
}

impl<N> RawIter<'_, N> {
    pub(crate) fn empty() -> Self {
        Self {
            front: SmallVec::new(),
            back: SmallVec::new(),
            remaining: 0,
        }
    }
}

impl<N> Clone for RawIter<'_, N> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}
