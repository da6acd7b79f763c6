//! The nodes of an [`OrderedTree`](crate::OrderedTree).
//!
//! A [`Node`] owns its two children and keeps a non-owning pointer back to its parent. Every
//! node heads the subtree below it, so searching, navigating, traversing, and validating are
//! all methods on `Node` and can start anywhere in the tree.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::OrderedTree;
//!
//! let tree = OrderedTree::from_keys([7, 2, 5, 10, 9, 1]).unwrap();
//! let two = tree.search(&2).unwrap();
//!
//! // `2` heads the subtree holding `1`, `2` and `5`.
//! assert_eq!(two.to_ordered_vec(), vec![1, 2, 5]);
//! assert_eq!(two.height(), 1);
//! assert_eq!(two.depth(), 1);
//! assert_eq!(two.to_string(), "(1) <- 2 -> (5)");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter;
use std::mem;
use std::ops::Bound;
use std::ptr::{self, NonNull};

use log::trace;

use crate::iter::{InOrder, Keys, PostOrder, PreOrder};

pub(crate) type NodePtr<K> = NonNull<Node<K>>;

/// A pointer to a node, or nothing. Used for both the owning child links and the non-owning
/// parent link: which one it is depends only on the field holding it.
pub(crate) struct Link<K>(pub(crate) Option<NodePtr<K>>);

impl<K> Clone for Link<K> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}
impl<K> Copy for Link<K> {}

impl<K> Link<K> {
    pub(crate) const fn none() -> Self {
        Self(None)
    }

    pub(crate) fn node(&self) -> Option<&Node<K>> {
        // SAFETY: A `Link` that is not `None` points at a live node of the same tree as the node
        // (or tree) holding the link. Nodes are only freed through `&mut OrderedTree`, so while
        // `self` is borrowed the pointee can't be freed or mutated.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    pub(crate) fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Whether this link points at exactly `node`.
    pub(crate) fn holds(&self, node: &Node<K>) -> bool {
        self.0.map_or(false, |ptr| ptr::eq(ptr.as_ptr(), node))
    }
}

/// A single node of an [`OrderedTree`](crate::OrderedTree).
///
/// Every key in the left subtree is strictly less than this node's key and every key in the
/// right subtree is greater than or equal to it.
pub struct Node<K> {
    pub(crate) key: K,
    pub(crate) left: Link<K>,
    pub(crate) right: Link<K>,
    pub(crate) parent: Link<K>,
}

impl<K> fmt::Debug for Node<K>
where
    K: fmt::Debug,
{
    // The parent is left out, it would print the whole tree again.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

/// Renders the subtree as `(left) <- key -> (right)`, leaving out missing children. Meant for
/// debugging, not as a stable format.
impl<K> fmt::Display for Node<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(left) = self.left() {
            write!(f, "({left}) <- ")?;
        }
        write!(f, "{}", self.key)?;
        if let Some(right) = self.right() {
            write!(f, " -> ({right})")?;
        }
        Ok(())
    }
}

impl<K> Node<K> {
    /// Allocates a childless node below `parent`. The caller is responsible for putting the
    /// returned pointer into `parent`'s child slot (or the tree's root).
    pub(crate) fn new_leaf(key: K, parent: Link<K>) -> NodePtr<K> {
        NonNull::from(Box::leak(Box::new(Node {
            key,
            left: Link::none(),
            right: Link::none(),
            parent,
        })))
    }

    /// The key stored in this node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The left child, if any.
    pub fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    /// The right child, if any.
    pub fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    /// The node holding this one as a child. `None` for the root.
    pub fn parent(&self) -> Option<&Self> {
        self.parent.node()
    }

    /// Whether this node is the root of its tree.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Whether this node is its parent's left child.
    pub fn is_left_child(&self) -> bool {
        self.parent().map_or(false, |parent| parent.left.holds(self))
    }

    /// Whether this node is its parent's right child.
    pub fn is_right_child(&self) -> bool {
        self.parent().map_or(false, |parent| parent.right.holds(self))
    }

    /// Whether this node has a left child.
    pub fn has_left_child(&self) -> bool {
        !self.left.is_none()
    }

    /// Whether this node has a right child.
    pub fn has_right_child(&self) -> bool {
        !self.right.is_none()
    }

    /// Whether this node has both children.
    pub fn has_both_children(&self) -> bool {
        self.has_left_child() && self.has_right_child()
    }

    /// Finds a node holding `key` in the subtree headed by this node. Equal keys are stored to
    /// the right of each other, so with duplicates this returns the shallowest match.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from_keys([7, 2, 5, 10, 9, 1]).unwrap();
    /// let root = tree.root().unwrap();
    ///
    /// assert_eq!(root.search(&9).map(|n| *n.key()), Some(9));
    /// assert!(root.search(&42).is_none());
    /// ```
    pub fn search(&self, key: &K) -> Option<&Self>
    where
        K: Ord,
    {
        let mut node = self;
        loop {
            node = match key.cmp(&node.key) {
                Ordering::Less => node.left()?,
                Ordering::Equal => return Some(node),
                Ordering::Greater => node.right()?,
            };
        }
    }

    /// Whether the subtree headed by this node holds `key`.
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.search(key).is_some()
    }

    /// The node with the smallest key in this subtree. This node itself if it has no left child.
    pub fn minimum(&self) -> &Self {
        let mut node = self;
        while let Some(left) = node.left() {
            node = left;
        }
        node
    }

    /// The node with the largest key in this subtree. This node itself if it has no right child.
    pub fn maximum(&self) -> &Self {
        let mut node = self;
        while let Some(right) = node.right() {
            node = right;
        }
        node
    }

    /// The node whose key comes immediately before this one in sorted order. Nodes with a key
    /// equal to this one are skipped. `None` for the tree's minimum.
    pub fn predecessor(&self) -> Option<&Self>
    where
        K: Ord,
    {
        if let Some(left) = self.left() {
            return Some(left.maximum());
        }
        self.ancestors().find(|ancestor| ancestor.key < self.key)
    }

    /// The node whose key comes immediately after this one in sorted order. Nodes with a key
    /// equal to this one are skipped. `None` for the tree's maximum.
    pub fn successor(&self) -> Option<&Self>
    where
        K: Ord,
    {
        if let Some(right) = self.right() {
            return Some(right.minimum());
        }
        self.ancestors().find(|ancestor| ancestor.key > self.key)
    }

    /// How many edges separate this node from the root. The root has depth 0.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// How many edges separate this node from the deepest leaf below it. A leaf has height 0.
    /// This visits the whole subtree.
    pub fn height(&self) -> usize {
        if self.is_leaf() {
            return 0;
        }
        let left_height = self.left().map_or(0, Self::height);
        let right_height = self.right().map_or(0, Self::height);
        1 + left_height.max(right_height)
    }

    /// How many nodes are in this subtree, this one included. This visits the whole subtree.
    pub fn count(&self) -> usize {
        1 + self.left().map_or(0, Self::count) + self.right().map_or(0, Self::count)
    }

    fn ancestors(&self) -> impl Iterator<Item = &Self> {
        iter::successors(self.parent(), |node| node.parent())
    }

    /// Visits this subtree left, self, right: the keys come out sorted.
    pub fn in_order(&self) -> InOrder<'_, K> {
        InOrder::new(Some(self))
    }

    /// Visits this subtree self, left, right.
    pub fn pre_order(&self) -> PreOrder<'_, K> {
        PreOrder::new(Some(self))
    }

    /// Visits this subtree left, right, self.
    pub fn post_order(&self) -> PostOrder<'_, K> {
        PostOrder::new(Some(self))
    }

    /// The keys of this subtree in sorted order.
    pub fn keys(&self) -> Keys<'_, K> {
        Keys::new(self.in_order())
    }

    /// Collects the keys of this subtree in sorted order.
    pub fn to_ordered_vec(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.keys().cloned().collect()
    }

    /// Applies `f` to the keys of this subtree in sorted order and collects the results.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from_keys([3, 1, 2]).unwrap();
    /// let root = tree.root().unwrap();
    ///
    /// assert_eq!(root.map_in_order(|key| key * 10), vec![10, 20, 30]);
    /// ```
    pub fn map_in_order<T, F>(&self, f: F) -> Vec<T>
    where
        F: FnMut(&K) -> T,
    {
        self.keys().map(f).collect()
    }

    /// Checks the ordering invariant over this whole subtree.
    pub fn is_valid_ordered_tree(&self) -> bool
    where
        K: Ord,
    {
        self.is_valid_within(Bound::Unbounded, Bound::Unbounded)
    }

    /// Checks that every key of this subtree lies between `lower` and `upper` and that the
    /// ordering invariant holds below every node. Going left, the upper bound tightens to
    /// `Excluded(key)`; going right, the lower bound tightens to `Included(key)`.
    pub fn is_valid_within(&self, lower: Bound<&K>, upper: Bound<&K>) -> bool
    where
        K: Ord,
    {
        let above_lower = match lower {
            Bound::Included(lower) => &self.key >= lower,
            Bound::Excluded(lower) => &self.key > lower,
            Bound::Unbounded => true,
        };
        let below_upper = match upper {
            Bound::Included(upper) => &self.key <= upper,
            Bound::Excluded(upper) => &self.key < upper,
            Bound::Unbounded => true,
        };

        above_lower
            && below_upper
            && self
                .left()
                .map_or(true, |left| left.is_valid_within(lower, Bound::Excluded(&self.key)))
            && self
                .right()
                .map_or(true, |right| right.is_valid_within(Bound::Included(&self.key), upper))
    }

    /// Panics if a child of this node is out of order or doesn't point back at this node.
    fn assert_links(&self)
    where
        K: Ord,
    {
        if let Some(left) = self.left() {
            assert!(left.key < self.key, "left child is not less than its parent");
            assert!(left.parent.holds(self), "left child has the wrong parent");
        }
        if let Some(right) = self.right() {
            assert!(right.key >= self.key, "right child is less than its parent");
            assert!(right.parent.holds(self), "right child has the wrong parent");
        }
    }

    /// Deep copies this subtree, hanging the copy below `parent`.
    pub(crate) fn clone_subtree(&self, parent: Link<K>) -> NodePtr<K>
    where
        K: Clone,
    {
        let head = Self::new_leaf(self.key.clone(), parent);
        // Pairs of a node to copy the children of and its copy.
        let mut pending = vec![(self, head)];
        while let Some((source, copy)) = pending.pop() {
            let (left, right) = (source.left(), source.right());
            let copy_of = |child: &Self| Self::new_leaf(child.key.clone(), Link(Some(copy)));
            let left_copy = left.map(copy_of);
            let right_copy = right.map(copy_of);
            pending.extend(left.zip(left_copy));
            pending.extend(right.zip(right_copy));
            // SAFETY: `copy` was allocated by this function and is only reachable from here.
            unsafe {
                (*copy.as_ptr()).left = Link(left_copy);
                (*copy.as_ptr()).right = Link(right_copy);
            }
        }
        head
    }

    /// Inserts `key` as a new leaf in the subtree headed by `head` and returns the new leaf.
    /// Smaller keys go left, everything else (equal keys included) goes right.
    ///
    /// # Safety
    ///
    /// `head` must point at a live node of a tree the caller has exclusive access to.
    pub(crate) unsafe fn insert_below(head: NodePtr<K>, key: K) -> NodePtr<K>
    where
        K: Ord,
    {
        let mut current = head;
        let mut depth = 1;
        loop {
            let node = current.as_ptr();
            let slot = if key < (*node).key {
                &mut (*node).left
            } else {
                &mut (*node).right
            };
            match slot.0 {
                Some(child) => current = child,
                None => {
                    let leaf = Self::new_leaf(key, Link(Some(current)));
                    slot.0 = Some(leaf);
                    trace!("inserted a leaf {depth} levels below the insertion point");

                    if cfg!(debug_assertions) {
                        (*node).assert_links();
                    }
                    return leaf;
                }
            }
            depth += 1;
        }
    }

    /// Detaches `this` from its tree and returns the node that took its place. `this` ends up
    /// with no links at all but is *not* freed.
    ///
    /// The replacement is the minimum of the right subtree if there is one, otherwise the
    /// maximum of the left subtree. The replacement is first removed from its own position
    /// (by these same rules) and then takes over `this`'s children and parent. That makes a
    /// chain of replacements, each one below the previous, so the chain is collected first and
    /// spliced from the deepest node upwards.
    ///
    /// # Safety
    ///
    /// `this` must point at a live node of a tree the caller has exclusive access to.
    pub(crate) unsafe fn unlink(this: NodePtr<K>) -> Link<K>
    where
        K: Ord,
    {
        // Each entry is a node to remove and the right chain it carries when it replaces the
        // entry before it.
        let mut chain = vec![(this, Link::none())];
        let mut last = this;
        while let Some((replacement, carried)) = Self::take_replacement(last) {
            chain.push((replacement, carried));
            last = replacement;
        }
        let replacement = Link(chain.get(1).map(|(replacement, _)| *replacement));

        let mut below: Option<(NodePtr<K>, Link<K>)> = None;
        for (removed, carried) in chain.into_iter().rev() {
            let node = removed.as_ptr();
            if let Some((spliced, spliced_carried)) = below {
                // NB read after the deeper splices, which may have changed them.
                (*spliced.as_ptr()).left = (*node).left;
                (*spliced.as_ptr()).right = match (*node).right.0 {
                    Some(_) => (*node).right,
                    None => spliced_carried,
                };
                Self::adopt_children(spliced);
            }
            Self::reconnect_parent(removed, Link(below.map(|(spliced, _)| spliced)));

            (*node).left = Link::none();
            (*node).right = Link::none();
            (*node).parent = Link::none();

            if cfg!(debug_assertions) {
                if let Some((spliced, _)) = below {
                    (*spliced.as_ptr()).assert_links();
                }
            }
            below = Some((removed, carried));
        }
        replacement
    }

    /// Picks the node that will take `this`'s place, if any. In the left-only case the
    /// replacement's right chain is detached and returned so it can be hung back below it.
    ///
    /// # Safety
    ///
    /// `this` must point at a live node of a tree the caller has exclusive access to.
    unsafe fn take_replacement(this: NodePtr<K>) -> Option<(NodePtr<K>, Link<K>)>
    where
        K: Ord,
    {
        let node = this.as_ptr();
        match ((*node).left.0, (*node).right.0) {
            (None, None) => {
                trace!("removing a leaf");
                None
            }
            (_, Some(right)) => {
                trace!("replacing a removed node with the minimum of its right subtree");
                Some((Self::leftmost(right), Link::none()))
            }
            (Some(left), None) => {
                trace!("replacing a removed node with the maximum of its left subtree");
                let maximum = Self::topmost_maximum(left);
                // Everything right of the shallowest maximum has the same key, so it has to stay
                // on the right of the replacement.
                let carried = mem::replace(&mut (*maximum.as_ptr()).right, Link::none());
                Some((maximum, carried))
            }
        }
    }

    /// Frees a node that [`Node::unlink`] detached and hands back its key.
    ///
    /// # Safety
    ///
    /// `this` must be detached and nothing may dereference it afterwards.
    pub(crate) unsafe fn free(this: NodePtr<K>) -> K {
        let Node { key, .. } = *Box::from_raw(this.as_ptr());
        key
    }

    /// # Safety
    ///
    /// `this` must point at a live node.
    unsafe fn leftmost(mut this: NodePtr<K>) -> NodePtr<K> {
        while let Some(left) = (*this.as_ptr()).left.0 {
            this = left;
        }
        this
    }

    /// The shallowest node in `head`'s subtree holding the subtree's largest key. Without
    /// duplicates this is simply the rightmost node.
    ///
    /// # Safety
    ///
    /// `head` must point at a live node.
    unsafe fn topmost_maximum(head: NodePtr<K>) -> NodePtr<K>
    where
        K: Ord,
    {
        let mut maximum = head;
        while let Some(right) = (*maximum.as_ptr()).right.0 {
            maximum = right;
        }
        while maximum != head {
            let parent = (*maximum.as_ptr())
                .parent
                .0
                .expect("Node below the head has a parent");
            if (*parent.as_ptr()).key != (*maximum.as_ptr()).key {
                break;
            }
            maximum = parent;
        }
        maximum
    }

    /// Points the parent links of `this`'s children at `this`.
    ///
    /// # Safety
    ///
    /// `this` and its children must be live.
    unsafe fn adopt_children(this: NodePtr<K>) {
        let node = this.as_ptr();
        for child in [(*node).left.0, (*node).right.0].into_iter().flatten() {
            (*child.as_ptr()).parent = Link(Some(this));
        }
    }

    /// Makes `this`'s parent hold `replacement` where it used to hold `this`, and points
    /// `replacement` back at that parent.
    ///
    /// # Safety
    ///
    /// `this`, its parent and `replacement` must be live.
    unsafe fn reconnect_parent(this: NodePtr<K>, replacement: Link<K>) {
        let parent = (*this.as_ptr()).parent;
        if let Some(parent) = parent.0 {
            let parent = parent.as_ptr();
            if (*parent).left.0 == Some(this) {
                (*parent).left = replacement;
            } else {
                assert!(
                    (*parent).right.0 == Some(this),
                    "Parent doesn't hold the node being removed"
                );
                (*parent).right = replacement;
            }
        }
        if let Some(replacement) = replacement.0 {
            (*replacement.as_ptr()).parent = parent;
        }
    }
}
