use alloc::boxed::Box;
use core::cmp::max;
use core::fmt;

/// The storage contract shared by every node a [`SortedTree`] can hold.
///
/// A node owns its key, its content, a cached height, and up to two
/// children. Children are owned exclusively through `Box`, so a tree is a
/// strict ownership hierarchy without parent links or cycles.
///
/// Heights and sizes deliberately behave differently:
///
/// - [`size`](TreeNode::size) is recomputed by traversal on every call and is
///   therefore always consistent with the current links.
/// - [`height`](TreeNode::height) is a cache. [`set_left`](TreeNode::set_left)
///   and [`set_right`](TreeNode::set_right) never refresh it; call
///   [`update_height`](TreeNode::update_height) once the children are in
///   place before relying on the height or the balance factor.
///
/// [`SortedTree`]: crate::SortedTree
pub trait TreeNode: Sized {
    /// The sort key.
    type Key;
    /// The payload carried alongside the key.
    type Content;

    /// Creates a detached leaf with height 1.
    fn from_parts(key: Self::Key, content: Self::Content) -> Self;

    /// Consumes the node, returning its key and content. Children are dropped.
    fn into_parts(self) -> (Self::Key, Self::Content);

    /// Returns the key.
    fn key(&self) -> &Self::Key;

    /// Replaces the key, returning the old one.
    ///
    /// Callers must preserve the ordering of the tree the node belongs to.
    fn replace_key(&mut self, key: Self::Key) -> Self::Key;

    /// Returns the content.
    fn content(&self) -> &Self::Content;

    /// Returns the content mutably.
    fn content_mut(&mut self) -> &mut Self::Content;

    /// Replaces the content, returning the old one.
    fn replace_content(&mut self, content: Self::Content) -> Self::Content;

    /// Returns the cached height. A leaf has height 1.
    fn height(&self) -> usize;

    /// Recomputes the cached height from the cached heights of the children.
    fn update_height(&mut self);

    /// Returns the left child.
    fn left(&self) -> Option<&Self>;

    /// Returns the right child.
    fn right(&self) -> Option<&Self>;

    /// Returns the left child mutably.
    fn left_mut(&mut self) -> Option<&mut Self>;

    /// Returns the right child mutably.
    fn right_mut(&mut self) -> Option<&mut Self>;

    /// Replaces the left child, returning the previous one.
    fn set_left(&mut self, child: Option<Box<Self>>) -> Option<Box<Self>>;

    /// Replaces the right child, returning the previous one.
    fn set_right(&mut self, child: Option<Box<Self>>) -> Option<Box<Self>>;

    /// Returns `height(right) - height(left)` using the cached child heights.
    #[allow(clippy::cast_possible_wrap)]
    fn balance_factor(&self) -> isize {
        height_of(self.right()) as isize - height_of(self.left()) as isize
    }

    /// Returns the number of nodes in the subtree rooted here.
    ///
    /// # Complexity
    ///
    /// O(n) in the size of the subtree.
    fn size(&self) -> usize {
        1 + self.left().map_or(0, TreeNode::size) + self.right().map_or(0, TreeNode::size)
    }

    /// Returns the node reached by following left links until none remain.
    fn leftmost(&self) -> &Self {
        let mut current = self;
        while let Some(left) = current.left() {
            current = left;
        }
        current
    }

    /// Returns the node reached by following right links until none remain.
    fn rightmost(&self) -> &Self {
        let mut current = self;
        while let Some(right) = current.right() {
            current = right;
        }
        current
    }
}

/// Returns the cached height of `node`, or 0 when it is absent.
#[inline]
pub(crate) fn height_of<N: TreeNode>(node: Option<&N>) -> usize {
    node.map_or(0, TreeNode::height)
}

/// A key/content node, the storage unit of [`SortedMap`](crate::SortedMap).
///
/// # Examples
///
/// ```
/// use osavl_tree::{Node, TreeNode};
///
/// let mut root = Node::new(5, "five");
/// root.set_left(Some(Box::new(Node::new(3, "three"))));
///
/// // Linking a child leaves the cached height untouched.
/// assert_eq!(root.height(), 1);
/// assert_eq!(root.size(), 2);
///
/// root.update_height();
/// assert_eq!(root.height(), 2);
/// assert_eq!(root.balance_factor(), -1);
/// assert_eq!(*root.leftmost().key(), 3);
/// ```
#[derive(Clone)]
pub struct Node<K, V> {
    key: K,
    content: V,
    height: usize,
    left: Option<Box<Node<K, V>>>,
    right: Option<Box<Node<K, V>>>,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf.
    #[must_use]
    pub const fn new(key: K, content: V) -> Self {
        Self {
            key,
            content,
            height: 1,
            left: None,
            right: None,
        }
    }
}

impl<K, V> TreeNode for Node<K, V> {
    type Key = K;
    type Content = V;

    fn from_parts(key: K, content: V) -> Self {
        Self::new(key, content)
    }

    fn into_parts(self) -> (K, V) {
        (self.key, self.content)
    }

    #[inline]
    fn key(&self) -> &K {
        &self.key
    }

    fn replace_key(&mut self, key: K) -> K {
        core::mem::replace(&mut self.key, key)
    }

    #[inline]
    fn content(&self) -> &V {
        &self.content
    }

    #[inline]
    fn content_mut(&mut self) -> &mut V {
        &mut self.content
    }

    fn replace_content(&mut self, content: V) -> V {
        core::mem::replace(&mut self.content, content)
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    fn update_height(&mut self) {
        self.height = 1 + max(height_of(self.left.as_deref()), height_of(self.right.as_deref()));
    }

    #[inline]
    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    #[inline]
    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    fn left_mut(&mut self) -> Option<&mut Self> {
        self.left.as_deref_mut()
    }

    fn right_mut(&mut self) -> Option<&mut Self> {
        self.right.as_deref_mut()
    }

    fn set_left(&mut self, child: Option<Box<Self>>) -> Option<Box<Self>> {
        core::mem::replace(&mut self.left, child)
    }

    fn set_right(&mut self, child: Option<Box<Self>>) -> Option<Box<Self>> {
        core::mem::replace(&mut self.right, child)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("content", &self.content)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// An element-only node, the storage unit of [`SortedList`](crate::SortedList).
///
/// This is the earlier-generation node kept for the collection types: it
/// honors the same height, size, balance, and leftmost-descendant contract as
/// [`Node`] but stores only the sorting key. Its content type is `()`.
#[derive(Clone)]
pub struct ElementNode<T> {
    element: T,
    unit: (),
    height: usize,
    left: Option<Box<ElementNode<T>>>,
    right: Option<Box<ElementNode<T>>>,
}

impl<T> ElementNode<T> {
    /// Creates a detached leaf.
    #[must_use]
    pub const fn new(element: T) -> Self {
        Self {
            element,
            unit: (),
            height: 1,
            left: None,
            right: None,
        }
    }

    /// Returns the element. Equivalent to [`TreeNode::key`].
    #[inline]
    #[must_use]
    pub fn element(&self) -> &T {
        &self.element
    }
}

impl<T> TreeNode for ElementNode<T> {
    type Key = T;
    type Content = ();

    fn from_parts(element: T, (): ()) -> Self {
        Self::new(element)
    }

    fn into_parts(self) -> (T, ()) {
        (self.element, ())
    }

    #[inline]
    fn key(&self) -> &T {
        &self.element
    }

    fn replace_key(&mut self, element: T) -> T {
        core::mem::replace(&mut self.element, element)
    }

    #[inline]
    fn content(&self) -> &() {
        &self.unit
    }

    #[inline]
    fn content_mut(&mut self) -> &mut () {
        &mut self.unit
    }

    fn replace_content(&mut self, (): ()) {}

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    fn update_height(&mut self) {
        self.height = 1 + max(height_of(self.left.as_deref()), height_of(self.right.as_deref()));
    }

    #[inline]
    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    #[inline]
    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    fn left_mut(&mut self) -> Option<&mut Self> {
        self.left.as_deref_mut()
    }

    fn right_mut(&mut self) -> Option<&mut Self> {
        self.right.as_deref_mut()
    }

    fn set_left(&mut self, child: Option<Box<Self>>) -> Option<Box<Self>> {
        core::mem::replace(&mut self.left, child)
    }

    fn set_right(&mut self, child: Option<Box<Self>>) -> Option<Box<Self>> {
        core::mem::replace(&mut self.right, child)
    }
}

impl<T: fmt::Debug> fmt::Debug for ElementNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementNode")
            .field("element", &self.element)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
