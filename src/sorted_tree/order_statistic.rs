use core::cmp::Ordering;

use super::SortedTree;
use crate::error::{Error, Result};
use crate::node::TreeNode;
use crate::ordering::Comparator;
use crate::raw::avl;

/// Which of several equal keys a rank lookup reports.
#[derive(Clone, Copy)]
enum Occurrence {
    Any,
    First,
    Last,
}

impl<N: TreeNode, C> SortedTree<N, C> {
    /// Returns the node at position `index` in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= self.len()`.
    ///
    /// # Complexity
    ///
    /// O(log n) steps, each measuring the size of a left subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::{Error, Node, SortedTree, TreeNode};
    ///
    /// let tree: SortedTree<Node<char, u8>> = [('c', 3), ('a', 1), ('b', 2)].into_iter().collect();
    /// assert_eq!(*tree.get_at(2).unwrap().key(), 'c');
    /// assert_eq!(tree.get_at(3).unwrap_err(), Error::OutOfBounds { index: 3, len: 3 });
    /// ```
    pub fn get_at(&self, index: usize) -> Result<&N> {
        if index >= self.len {
            return Err(Error::out_of_bounds(index, self.len));
        }

        let mut current = self.root.as_deref();
        let mut remaining = index;
        while let Some(node) = current {
            let left_size = node.left().map_or(0, TreeNode::size);
            current = match remaining.cmp(&left_size) {
                Ordering::Less => node.left(),
                Ordering::Equal => return Ok(node),
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    node.right()
                }
            };
        }

        unreachable!("`get_at()` - tree size invariant violated, rank {index} not found (len: {})", self.len)
    }

    /// Returns the content of the node at position `index` in sorted order,
    /// mutably.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= self.len()`.
    pub fn get_content_mut_at(&mut self, index: usize) -> Result<&mut N::Content> {
        if index >= self.len {
            return Err(Error::out_of_bounds(index, self.len));
        }

        let len = self.len;
        let mut current = self.root.as_deref_mut();
        let mut remaining = index;
        while let Some(node) = current {
            let left_size = node.left().map_or(0, TreeNode::size);
            current = match remaining.cmp(&left_size) {
                Ordering::Less => node.left_mut(),
                Ordering::Equal => return Ok(node.content_mut()),
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    node.right_mut()
                }
            };
        }

        unreachable!("`get_content_mut_at()` - tree size invariant violated, rank {index} not found (len: {len})")
    }

    /// Removes the node at position `index` in sorted order, returning its key
    /// and content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= self.len()`.
    pub fn remove_at(&mut self, index: usize) -> Result<(N::Key, N::Content)> {
        if index >= self.len {
            return Err(Error::out_of_bounds(index, self.len));
        }
        let root = self.root.take().expect("`remove_at()` - non-empty tree has no root!");
        let (root, removed) = avl::remove_at(root, index);
        self.root = root;
        self.len -= 1;
        Ok(removed)
    }
}

impl<N, C> SortedTree<N, C>
where
    N: TreeNode,
    C: Comparator<N::Key>,
{
    /// Returns the rank of a node whose key equals `key`, or `None` if the key
    /// is absent.
    ///
    /// With duplicate keys the rank of any one of the equal nodes may be
    /// returned; use [`first_index_of`](Self::first_index_of) or
    /// [`last_index_of`](Self::last_index_of) to pin it down.
    #[must_use]
    pub fn index_of(&self, key: &N::Key) -> Option<usize> {
        self.rank(key, Occurrence::Any)
    }

    /// Returns the rank of the first node whose key equals `key`.
    #[must_use]
    pub fn first_index_of(&self, key: &N::Key) -> Option<usize> {
        self.rank(key, Occurrence::First)
    }

    /// Returns the rank of the last node whose key equals `key`.
    #[must_use]
    pub fn last_index_of(&self, key: &N::Key) -> Option<usize> {
        self.rank(key, Occurrence::Last)
    }

    // Sums the left-subtree sizes skipped on the way down.
    fn rank(&self, key: &N::Key, occurrence: Occurrence) -> Option<usize> {
        let mut current = self.root.as_deref();
        let mut skipped = 0;
        let mut found = None;

        while let Some(node) = current {
            let left_size = node.left().map_or(0, TreeNode::size);
            current = match self.comparator.compare(key, node.key()) {
                Ordering::Less => node.left(),
                Ordering::Greater => {
                    skipped += left_size + 1;
                    node.right()
                }
                Ordering::Equal => {
                    found = Some(skipped + left_size);
                    match occurrence {
                        Occurrence::Any => return found,
                        Occurrence::First => node.left(),
                        Occurrence::Last => {
                            skipped += left_size + 1;
                            node.right()
                        }
                    }
                }
            };
        }
        found
    }
}
