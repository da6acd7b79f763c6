//! Iterators over the nodes of a subtree.
//!
//! None of these allocate: they follow the parent links back up and stop once they climb out
//! of the subtree they were started on. Calling the traversal method again starts a fresh
//! traversal.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::OrderedTree;
//!
//! let tree = OrderedTree::from_keys([7, 2, 5, 10, 9, 1]).unwrap();
//! let root = tree.root().unwrap();
//!
//! let in_order: Vec<_> = root.in_order().map(|n| *n.key()).collect();
//! let pre_order: Vec<_> = root.pre_order().map(|n| *n.key()).collect();
//! let post_order: Vec<_> = root.post_order().map(|n| *n.key()).collect();
//!
//! assert_eq!(in_order, vec![1, 2, 5, 7, 9, 10]);
//! assert_eq!(pre_order, vec![7, 2, 1, 5, 10, 9]);
//! assert_eq!(post_order, vec![1, 5, 2, 9, 10, 7]);
//! ```

use std::iter::FusedIterator;
use std::ptr;

use crate::node::Node;

/// Whether `node` is the node a traversal started on.
fn is_head<K>(head: Option<&Node<K>>, node: &Node<K>) -> bool {
    head.map_or(false, |head| ptr::eq(head, node))
}

/// Visits left subtree, node, right subtree. Created by [`Node::in_order`] and
/// [`OrderedTree::in_order`](crate::OrderedTree::in_order).
pub struct InOrder<'a, K> {
    head: Option<&'a Node<K>>,
    next: Option<&'a Node<K>>,
}

impl<'a, K> InOrder<'a, K> {
    pub(crate) fn new(head: Option<&'a Node<K>>) -> Self {
        Self {
            head,
            next: head.map(Node::minimum),
        }
    }
}

impl<'a, K> Clone for InOrder<'a, K> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            next: self.next,
        }
    }
}

impl<'a, K> Iterator for InOrder<'a, K> {
    type Item = &'a Node<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = match current.right() {
            Some(right) => Some(right.minimum()),
            None => {
                // Climb until we leave a left subtree: that parent comes next.
                let mut node = current;
                loop {
                    if is_head(self.head, node) {
                        break None;
                    }
                    let parent = node.parent().expect("Node below the head has a parent");
                    if node.is_left_child() {
                        break Some(parent);
                    }
                    node = parent;
                }
            }
        };
        Some(current)
    }
}

impl<'a, K> FusedIterator for InOrder<'a, K> {}

/// Visits node, left subtree, right subtree. Created by [`Node::pre_order`] and
/// [`OrderedTree::pre_order`](crate::OrderedTree::pre_order).
pub struct PreOrder<'a, K> {
    head: Option<&'a Node<K>>,
    next: Option<&'a Node<K>>,
}

impl<'a, K> PreOrder<'a, K> {
    pub(crate) fn new(head: Option<&'a Node<K>>) -> Self {
        Self { head, next: head }
    }

    /// The root of the next right subtree still to visit after `current`'s subtree is done.
    fn next_right_subtree(&self, current: &'a Node<K>) -> Option<&'a Node<K>> {
        let mut node = current;
        while !is_head(self.head, node) {
            let parent = node.parent()?;
            if node.is_left_child() {
                if let Some(right) = parent.right() {
                    return Some(right);
                }
            }
            node = parent;
        }
        None
    }
}

impl<'a, K> Clone for PreOrder<'a, K> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            next: self.next,
        }
    }
}

impl<'a, K> Iterator for PreOrder<'a, K> {
    type Item = &'a Node<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current
            .left()
            .or_else(|| current.right())
            .or_else(|| self.next_right_subtree(current));
        Some(current)
    }
}

impl<'a, K> FusedIterator for PreOrder<'a, K> {}

/// Visits left subtree, right subtree, node. Created by [`Node::post_order`] and
/// [`OrderedTree::post_order`](crate::OrderedTree::post_order).
pub struct PostOrder<'a, K> {
    head: Option<&'a Node<K>>,
    next: Option<&'a Node<K>>,
}

/// The first node a post-order traversal of `node`'s subtree visits: keep going down, left
/// when possible.
fn first_in_post_order<K>(mut node: &Node<K>) -> &Node<K> {
    while let Some(child) = node.left().or_else(|| node.right()) {
        node = child;
    }
    node
}

impl<'a, K> PostOrder<'a, K> {
    pub(crate) fn new(head: Option<&'a Node<K>>) -> Self {
        Self {
            head,
            next: head.map(first_in_post_order),
        }
    }
}

impl<'a, K> Clone for PostOrder<'a, K> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            next: self.next,
        }
    }
}

impl<'a, K> Iterator for PostOrder<'a, K> {
    type Item = &'a Node<K>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if is_head(self.head, current) {
            None
        } else {
            let parent = current.parent().expect("Node below the head has a parent");
            match parent.right() {
                Some(right) if current.is_left_child() => Some(first_in_post_order(right)),
                _ => Some(parent),
            }
        };
        Some(current)
    }
}

impl<'a, K> FusedIterator for PostOrder<'a, K> {}

/// The keys of a subtree in sorted order. Created by [`Node::keys`] and
/// [`OrderedTree::keys`](crate::OrderedTree::keys).
pub struct Keys<'a, K>(InOrder<'a, K>);

impl<'a, K> Keys<'a, K> {
    pub(crate) fn new(nodes: InOrder<'a, K>) -> Self {
        Self(nodes)
    }
}

impl<'a, K> Clone for Keys<'a, K> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(Node::key)
    }
}

impl<'a, K> FusedIterator for Keys<'a, K> {}
