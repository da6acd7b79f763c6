//! A mutable position inside an [`OrderedTree`].
//!
//! A [`Node`] can only be looked at through a shared borrow of its tree, so changing the tree
//! at a particular node (inserting below it or removing it) goes through a [`CursorMut`]
//! instead. A cursor points either at a node of the tree or at nothing.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::OrderedTree;
//!
//! let mut tree = OrderedTree::from_keys([7, 2, 5, 10, 9, 1]).unwrap();
//!
//! // Removing the root: the minimum of its right subtree takes its place and the cursor
//! // moves there.
//! let mut cursor = tree.cursor_mut();
//! assert_eq!(cursor.remove_current(), Some(7));
//! assert_eq!(cursor.current().map(|n| *n.key()), Some(9));
//!
//! assert_eq!(tree.root().map(|root| *root.key()), Some(9));
//! assert_eq!(tree.to_ordered_vec(), vec![1, 2, 5, 9, 10]);
//! ```

use log::debug;

use crate::node::{Link, Node};
use crate::tree::OrderedTree;

/// A cursor over an [`OrderedTree`] that can insert below and remove the node it points at.
/// Created by [`OrderedTree::cursor_mut`] and [`OrderedTree::cursor_mut_at`].
pub struct CursorMut<'a, K> {
    tree: &'a mut OrderedTree<K>,
    current: Link<K>,
}

impl<'a, K> CursorMut<'a, K> {
    pub(crate) fn new(tree: &'a mut OrderedTree<K>, current: Link<K>) -> Self {
        Self { tree, current }
    }

    /// The node the cursor points at.
    pub fn current(&self) -> Option<&Node<K>> {
        self.current.node()
    }

    #[cfg(test)]
    pub(crate) fn current_ptr(&self) -> Option<crate::node::NodePtr<K>> {
        self.current.0
    }

    /// Moves the cursor to whatever `step` picks starting from the current node. Stays put
    /// (and returns `false`) if the cursor points at nothing or `step` returns `None`.
    fn seek<F>(&mut self, step: F) -> bool
    where
        F: FnOnce(&Node<K>) -> Option<&Node<K>>,
    {
        let Some(target) = self.current().and_then(step) else {
            return false;
        };
        let target = self.tree.ptr_to(target);
        self.current = Link(Some(target));
        true
    }

    /// Moves to the left child. Returns whether the cursor moved.
    pub fn move_left(&mut self) -> bool {
        self.seek(Node::left)
    }

    /// Moves to the right child. Returns whether the cursor moved.
    pub fn move_right(&mut self) -> bool {
        self.seek(Node::right)
    }

    /// Moves to the parent. Returns whether the cursor moved.
    pub fn move_parent(&mut self) -> bool {
        self.seek(Node::parent)
    }

    /// Moves to the [predecessor](Node::predecessor). Returns whether the cursor moved.
    pub fn move_predecessor(&mut self) -> bool
    where
        K: Ord,
    {
        self.seek(Node::predecessor)
    }

    /// Moves to the [successor](Node::successor). Returns whether the cursor moved.
    pub fn move_successor(&mut self) -> bool
    where
        K: Ord,
    {
        self.seek(Node::successor)
    }

    /// Moves to the minimum of the current subtree. Returns whether the cursor moved.
    pub fn move_minimum(&mut self) -> bool {
        self.seek(|node| Some(node.minimum()))
    }

    /// Moves to the maximum of the current subtree. Returns whether the cursor moved.
    pub fn move_maximum(&mut self) -> bool {
        self.seek(|node| Some(node.maximum()))
    }

    /// Moves to the root of the tree, which is nothing if the tree is empty.
    pub fn move_root(&mut self) {
        self.current = self.tree.root_link();
    }

    /// Inserts `key` as a new leaf in the subtree headed by the current node, or from the root
    /// if the cursor points at nothing. The cursor doesn't move.
    ///
    /// The subtree stays ordered, but the whole tree only does if `key` belongs in this
    /// subtree, i.e. it lies within the bounds set by the current node's ancestors.
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        match self.current.0 {
            Some(head) => {
                // SAFETY: `head` is a live node of the tree we borrow mutably.
                unsafe { Node::insert_below(head, key) };
                self.tree.grow();
            }
            None => {
                self.tree.insert(key);
            }
        }
    }

    /// Removes the current node from the tree and returns its key. The cursor moves to the
    /// node that took the removed node's place, or to nothing if a leaf was removed. Returns
    /// `None` (and does nothing) if the cursor points at nothing.
    ///
    /// The replacement is the minimum of the right subtree if there is one, otherwise the
    /// maximum of the left subtree. If the root is removed, the replacement becomes the new
    /// root.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::from_keys([7, 2, 5, 10, 9, 1]).unwrap();
    ///
    /// // `2` has both children, so the minimum of its right subtree (`5`) replaces it.
    /// let mut cursor = tree.cursor_mut_at(&2);
    /// assert_eq!(cursor.remove_current(), Some(2));
    /// assert_eq!(cursor.current().map(|n| *n.key()), Some(5));
    ///
    /// // `9` is a leaf so nothing replaces it.
    /// let mut cursor = tree.cursor_mut_at(&9);
    /// assert_eq!(cursor.remove_current(), Some(9));
    /// assert!(cursor.current().is_none());
    /// assert_eq!(cursor.remove_current(), None);
    ///
    /// assert_eq!(tree.to_ordered_vec(), vec![1, 5, 7, 10]);
    /// ```
    pub fn remove_current(&mut self) -> Option<K>
    where
        K: Ord,
    {
        let removed = self.current.0?;
        // SAFETY: `removed` is a live node of the tree we borrow mutably, so nothing else can
        // look at the tree while it's restructured. Once `unlink` returns nothing links to
        // `removed` anymore and `self.current` is overwritten before it's freed.
        unsafe {
            let was_root = (*removed.as_ptr()).parent.is_none();
            let replacement = Node::unlink(removed);
            if was_root {
                debug!("the root was removed, its replacement is the new root");
                self.tree.set_root(replacement);
            }
            self.tree.shrink();
            self.current = replacement;
            Some(Node::free(removed))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test::links::assert_parent_links;
    use crate::test::quick::Op;

    fn sample() -> OrderedTree<i32> {
        OrderedTree::from_keys([7, 2, 5, 10, 9, 1]).unwrap()
    }

    fn current_key(cursor: &CursorMut<'_, i32>) -> Option<i32> {
        cursor.current().map(|node| *node.key())
    }

    #[test]
    fn navigation() {
        let mut tree = sample();
        let mut cursor = tree.cursor_mut();
        assert_eq!(current_key(&cursor), Some(7));

        assert!(!cursor.move_parent());
        assert!(cursor.move_left());
        assert_eq!(current_key(&cursor), Some(2));
        assert!(cursor.move_right());
        assert_eq!(current_key(&cursor), Some(5));
        assert!(!cursor.move_right());

        assert!(cursor.move_successor());
        assert_eq!(current_key(&cursor), Some(7));
        assert!(cursor.move_predecessor());
        assert_eq!(current_key(&cursor), Some(5));

        cursor.move_root();
        assert!(cursor.move_maximum());
        assert_eq!(current_key(&cursor), Some(10));
        assert!(!cursor.move_successor());

        cursor.move_root();
        assert!(cursor.move_minimum());
        assert_eq!(current_key(&cursor), Some(1));
        assert!(!cursor.move_predecessor());
    }

    #[test]
    fn cursor_at_missing_key_points_at_nothing() {
        let mut tree = sample();
        let mut cursor = tree.cursor_mut_at(&42);

        assert!(cursor.current().is_none());
        assert!(!cursor.move_left());
        assert_eq!(cursor.remove_current(), None);

        // Inserting from nothing starts at the root.
        cursor.insert(8);
        drop(cursor);
        assert_eq!(tree.search(&8).unwrap().parent().map(Node::key), Some(&9));
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn insert_below_current() {
        let mut tree = sample();
        let mut cursor = tree.cursor_mut_at(&10);
        cursor.insert(11);
        cursor.insert(8);
        assert_eq!(current_key(&cursor), Some(10));
        drop(cursor);

        assert_eq!(tree.len(), 8);
        assert_eq!(tree.search(&11).unwrap().parent().map(Node::key), Some(&10));
        assert_eq!(tree.search(&8).unwrap().parent().map(Node::key), Some(&9));
        assert!(tree.is_valid_ordered_tree());
    }

    #[test]
    fn insert_below_current_can_break_the_tree() {
        let mut tree = sample();
        let mut cursor = tree.cursor_mut_at(&10);
        // 3 belongs left of the root but the cursor only looks at 10's subtree.
        cursor.insert(3);
        drop(cursor);

        assert!(tree.search(&10).unwrap().is_valid_ordered_tree());
        assert!(!tree.is_valid_ordered_tree());
    }

    #[test]
    fn remove_leaf() {
        let mut tree = sample();
        let mut cursor = tree.cursor_mut_at(&1);

        assert_eq!(cursor.remove_current(), Some(1));
        assert!(cursor.current().is_none());
        drop(cursor);

        let two = tree.search(&2).unwrap();
        assert!(two.left().is_none());
        assert_eq!(tree.to_ordered_vec(), vec![2, 5, 7, 9, 10]);
        assert_parent_links(&tree);
    }

    #[test]
    fn remove_with_only_left_child() {
        let mut tree = sample();
        let mut cursor = tree.cursor_mut_at(&10);

        assert_eq!(cursor.remove_current(), Some(10));
        assert_eq!(current_key(&cursor), Some(9));
        drop(cursor);

        let root = tree.root().unwrap();
        assert_eq!(root.right().map(Node::key), Some(&9));
        assert!(root.right().unwrap().is_leaf());
        assert_parent_links(&tree);
    }

    #[test]
    fn remove_with_only_right_child() {
        let mut tree = OrderedTree::from_keys([5, 3, 8, 9, 10]).unwrap();
        let mut cursor = tree.cursor_mut_at(&8);

        assert_eq!(cursor.remove_current(), Some(8));
        assert_eq!(current_key(&cursor), Some(9));
        drop(cursor);

        // 9 took 8's place and kept its own right child.
        let nine = tree.search(&9).unwrap();
        assert_eq!(nine.parent().map(Node::key), Some(&5));
        assert_eq!(nine.right().map(Node::key), Some(&10));
        assert_parent_links(&tree);
    }

    #[test]
    fn remove_with_deep_replacement() {
        // 50's successor is 55, which is deep in the right subtree and has a right child.
        let mut tree = OrderedTree::from_keys([50, 30, 70, 60, 80, 55, 57, 56]).unwrap();
        let mut cursor = tree.cursor_mut();

        assert_eq!(cursor.remove_current(), Some(50));
        assert_eq!(current_key(&cursor), Some(55));
        drop(cursor);

        let root = tree.root().unwrap();
        assert_eq!(root.key(), &55);
        assert_eq!(root.left().map(Node::key), Some(&30));
        assert_eq!(root.right().map(Node::key), Some(&70));
        // 57 was 55's right child. Removing 55 first put 56 (57's minimum) in its place.
        assert_eq!(tree.search(&60).unwrap().left().map(Node::key), Some(&56));
        assert_eq!(tree.search(&56).unwrap().right().map(Node::key), Some(&57));

        assert_eq!(tree.to_ordered_vec(), vec![30, 55, 56, 57, 60, 70, 80]);
        assert!(tree.is_valid_ordered_tree());
        assert_parent_links(&tree);
    }

    #[test]
    fn remove_direct_right_child_replacement() {
        let mut tree = OrderedTree::from_keys([2, 1, 3, 4]).unwrap();

        assert_eq!(tree.remove(&2), Some(2));

        let root = tree.root().unwrap();
        assert_eq!(root.key(), &3);
        assert_eq!(root.left().map(Node::key), Some(&1));
        assert_eq!(root.right().map(Node::key), Some(&4));
        assert_parent_links(&tree);
    }

    #[test]
    fn remove_left_only_with_duplicate_maximum() {
        // 9 only has a left subtree whose maximum, 6, appears twice.
        let mut tree = OrderedTree::from_keys([9, 4, 6, 6, 5, 2]).unwrap();

        assert_eq!(tree.remove(&9), Some(9));

        // The shallower 6 took over and kept the other 6 on its right.
        let root = tree.root().unwrap();
        assert_eq!(root.key(), &6);
        assert_eq!(root.right().map(Node::key), Some(&6));
        assert_eq!(root.left().map(Node::key), Some(&4));
        assert_eq!(tree.to_ordered_vec(), vec![2, 4, 5, 6, 6]);
        assert!(tree.is_valid_ordered_tree());
        assert_parent_links(&tree);
    }

    #[test]
    fn remove_every_node_of_the_sample() {
        let original = vec![1, 2, 5, 7, 9, 10];
        for key in &original {
            let mut tree = sample();
            assert_eq!(tree.remove(key), Some(*key));

            let expected: Vec<_> = original.iter().copied().filter(|k| k != key).collect();
            assert_eq!(tree.to_ordered_vec(), expected);
            assert_eq!(tree.len(), 5);
            assert!(tree.is_valid_ordered_tree());
            assert_parent_links(&tree);
        }
    }

    quickcheck::quickcheck! {
        fn removing_under_a_cursor_keeps_the_tree_valid(first: i8, ops: Vec<Op<i8>>, at: i8) -> bool {
            let mut tree = OrderedTree::new(first);
            for op in ops {
                if let Op::Insert(key) = op {
                    tree.insert(key);
                }
            }
            let before = tree.len();

            let mut cursor = tree.cursor_mut();
            // Walk somewhere arbitrary, then remove whatever is there.
            for step in 0..at.unsigned_abs() {
                if step % 2 == 0 { cursor.move_left(); } else { cursor.move_right(); }
            }
            let removed = cursor.remove_current();
            drop(cursor);

            assert_parent_links(&tree);
            removed.is_some()
                && tree.len() == before - 1
                && tree.is_valid_ordered_tree()
        }
    }
}
