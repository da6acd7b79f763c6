//! A mutable, pointer-linked Binary Search Tree (BST) whose nodes know their parents.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and remove stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! sometimes has child `Node`s. The invariants of this BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key strictly less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than or equal to its own key. Duplicates are allowed and always
//!    go right.
//! 3. Every `Node` except the root has a parent, and that parent holds it in
//!    exactly one of its child slots.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching the tree takes `O(height)`. This tree does *not* rebalance itself, so the
//! height depends on the insertion order: inserting sorted keys produces a list. Insert
//! keys in a shuffled order if the height matters to you.
//!
//! Because every node links to its parent, any node can answer questions about its
//! neighbourhood (its predecessor, successor, or depth) without a handle to the root.
//! Each node also heads its own subtree, so searching, traversing or validating can
//! start from any node.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::OrderedTree;
//!
//! let mut tree = OrderedTree::from_keys([7, 2, 5, 10, 9, 1]).unwrap();
//!
//! let root = tree.root().unwrap();
//! assert_eq!(root.minimum().key(), &1);
//! assert_eq!(root.maximum().key(), &10);
//!
//! let five = root.search(&5).unwrap();
//! assert_eq!(five.parent().map(|p| *p.key()), Some(2));
//! assert_eq!(five.successor().map(|s| *s.key()), Some(7));
//!
//! assert_eq!(tree.remove(&1), Some(1));
//! assert_eq!(tree.to_ordered_vec(), vec![2, 5, 7, 9, 10]);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod cursor;
mod error;
pub mod iter;
pub mod node;
pub mod tree;

pub use cursor::CursorMut;
pub use error::{Error, Result};
pub use node::Node;
pub use tree::OrderedTree;

#[cfg(test)]
mod test {
    pub(crate) mod links;
    pub(crate) mod quick;
}
