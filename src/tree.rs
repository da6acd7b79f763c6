//! The owner of a tree of [`Node`]s.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::OrderedTree;
//!
//! let mut tree = OrderedTree::new(5);
//! tree.insert(3);
//! tree.insert(8);
//! tree.insert(3);
//!
//! // Duplicates are kept.
//! assert_eq!(tree.len(), 4);
//! assert_eq!(tree.to_ordered_vec(), vec![3, 3, 5, 8]);
//!
//! // Removing a node returns its key.
//! assert_eq!(tree.remove(&5), Some(5));
//! assert_eq!(tree.remove(&5), None);
//! assert_eq!(tree.root().map(|root| *root.key()), Some(8));
//! ```

use std::fmt;

use log::debug;

use crate::cursor::CursorMut;
use crate::error::{Error, Result};
use crate::iter::{InOrder, Keys, PostOrder, PreOrder};
use crate::node::{Link, Node, NodePtr};

/// An unbalanced Binary Search Tree with parent links. It owns every [`Node`] and keeps
/// track of which one is the root.
///
/// Read access goes through the nodes themselves (see [`OrderedTree::root`] and
/// [`OrderedTree::search`]); removing or inserting below a particular node goes through a
/// [`CursorMut`].
pub struct OrderedTree<K> {
    // This is a `Link` instead of an `Option<Box<Node>>` so that the root can be moved around
    // with the `OrderedTree` without the children's parent pointers breaking.
    root: Link<K>,
    len: usize,
}

impl<K> Drop for OrderedTree<K> {
    fn drop(&mut self) {
        // A work list instead of recursion: an unbalanced tree can be as deep as it is long.
        let mut pending: Vec<NodePtr<K>> = self.root.0.take().into_iter().collect();
        while let Some(ptr) = pending.pop() {
            // SAFETY: We own every node of the tree and each one is reachable through exactly one
            // child link (or the root) so it's pushed and freed exactly once. The nodes were
            // allocated using `Box::new` (in `Node::new_leaf`).
            let node = unsafe { Box::from_raw(ptr.as_ptr()) };
            pending.extend(node.left.0);
            pending.extend(node.right.0);
        }
    }
}

impl<K> Clone for OrderedTree<K>
where
    K: Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: Link(self.root().map(|root| root.clone_subtree(Link::none()))),
            len: self.len,
        }
    }
}

impl<K> fmt::Debug for OrderedTree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedTree")
            .field("len", &self.len)
            .field("root", &self.root())
            .finish()
    }
}

/// Renders the whole tree like [`Node`]'s `Display`. An empty tree renders as nothing.
impl<K> fmt::Display for OrderedTree<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => fmt::Display::fmt(root, f),
            None => Ok(()),
        }
    }
}

impl<K> OrderedTree<K> {
    /// Creates a tree holding only `key`.
    pub fn new(key: K) -> Self {
        Self {
            root: Link(Some(Node::new_leaf(key, Link::none()))),
            len: 1,
        }
    }

    /// Builds a tree from a sequence of keys. The first key becomes the root and the rest are
    /// inserted in order. No shuffling happens, so sorted input produces a tree as tall as it
    /// is long.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyKeys`] if `keys` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::{Error, OrderedTree};
    ///
    /// let tree = OrderedTree::from_keys([2, 1, 3]).unwrap();
    /// assert_eq!(tree.root().map(|root| *root.key()), Some(2));
    ///
    /// let empty = OrderedTree::<i32>::from_keys([]);
    /// assert_eq!(empty.unwrap_err(), Error::EmptyKeys);
    /// ```
    pub fn from_keys<I>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Ord,
    {
        let mut keys = keys.into_iter();
        let first = keys.next().ok_or(Error::EmptyKeys)?;

        let mut tree = Self::new(first);
        tree.extend(keys);

        debug!("built a tree of {} keys", tree.len);
        Ok(tree)
    }

    /// The root node. `None` only once every node has been removed.
    pub fn root(&self) -> Option<&Node<K>> {
        self.root.node()
    }

    /// How many nodes are in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether every node has been removed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `key` as a new leaf, descending from the root, and returns the new node. Equal
    /// keys are inserted to the right of the existing ones. If the tree is empty the new node
    /// becomes the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new(2);
    /// let three = tree.insert(3);
    ///
    /// assert_eq!(three.parent().map(|p| *p.key()), Some(2));
    /// assert!(three.is_right_child());
    /// ```
    pub fn insert(&mut self, key: K) -> &Node<K>
    where
        K: Ord,
    {
        let leaf = match self.root.0 {
            // SAFETY: `root` is a live node of this tree and we hold `&mut self`.
            Some(root) => unsafe { Node::insert_below(root, key) },
            None => {
                let root = Node::new_leaf(key, Link::none());
                self.root = Link(Some(root));
                root
            }
        };
        self.len += 1;
        // SAFETY: `leaf` was just linked into this tree and lives until it's removed, which
        // needs `&mut self`.
        unsafe { leaf.as_ref() }
    }

    /// Removes a node holding `key` (the one [`OrderedTree::search`] finds) and returns its key.
    /// Returns `None` if no node holds `key`.
    pub fn remove(&mut self, key: &K) -> Option<K>
    where
        K: Ord,
    {
        self.cursor_mut_at(key).remove_current()
    }

    /// Finds a node holding `key`. See [`Node::search`].
    pub fn search(&self, key: &K) -> Option<&Node<K>>
    where
        K: Ord,
    {
        self.root()?.search(key)
    }

    /// Whether any node holds `key`.
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.search(key).is_some()
    }

    /// The node with the smallest key.
    pub fn minimum(&self) -> Option<&Node<K>> {
        self.root().map(Node::minimum)
    }

    /// The node with the largest key.
    pub fn maximum(&self) -> Option<&Node<K>> {
        self.root().map(Node::maximum)
    }

    /// The height of the root. See [`Node::height`].
    pub fn height(&self) -> Option<usize> {
        self.root().map(Node::height)
    }

    /// Visits every node in sorted order.
    pub fn in_order(&self) -> InOrder<'_, K> {
        InOrder::new(self.root())
    }

    /// Visits every node, parents before their children.
    pub fn pre_order(&self) -> PreOrder<'_, K> {
        PreOrder::new(self.root())
    }

    /// Visits every node, children before their parents.
    pub fn post_order(&self) -> PostOrder<'_, K> {
        PostOrder::new(self.root())
    }

    /// Every key in sorted order.
    pub fn keys(&self) -> Keys<'_, K> {
        Keys::new(self.in_order())
    }

    /// Collects every key in sorted order.
    pub fn to_ordered_vec(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.keys().cloned().collect()
    }

    /// Whether the ordering invariant holds for the whole tree. An empty tree is valid.
    pub fn is_valid_ordered_tree(&self) -> bool
    where
        K: Ord,
    {
        self.root().map_or(true, Node::is_valid_ordered_tree)
    }

    /// A cursor pointing at the root.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K> {
        let root = self.root;
        CursorMut::new(self, root)
    }

    /// A cursor pointing at the node [`OrderedTree::search`] finds for `key`, or at nothing if
    /// no node holds `key`.
    pub fn cursor_mut_at(&mut self, key: &K) -> CursorMut<'_, K>
    where
        K: Ord,
    {
        let found = Link(self.search(key).map(|node| self.ptr_to(node)));
        CursorMut::new(self, found)
    }

    /// The pointer this tree stores for `node`: either its parent's child link or the root.
    ///
    /// Pointers read back out of the links are the ones `Node::new_leaf` created, so unlike a
    /// pointer made from `&Node` they may be written through once `&mut self` is held.
    pub(crate) fn ptr_to(&self, node: &Node<K>) -> NodePtr<K> {
        let link = match node.parent() {
            None => self.root,
            Some(parent) if parent.left.holds(node) => parent.left,
            Some(parent) => parent.right,
        };
        let ptr = link.0.expect("Node is linked from its parent or the root");
        debug_assert!(link.holds(node), "Node is not part of this tree");
        ptr
    }

    pub(crate) fn set_root(&mut self, root: Link<K>) {
        self.root = root;
    }

    pub(crate) fn root_link(&self) -> Link<K> {
        self.root
    }

    pub(crate) fn grow(&mut self) {
        self.len += 1;
    }

    pub(crate) fn shrink(&mut self) {
        self.len -= 1;
    }
}

impl<K> TryFrom<Vec<K>> for OrderedTree<K>
where
    K: Ord,
{
    type Error = Error;

    fn try_from(keys: Vec<K>) -> Result<Self> {
        Self::from_keys(keys)
    }
}

impl<K> Extend<K> for OrderedTree<K>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a OrderedTree<K> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}
