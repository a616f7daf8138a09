//! Cursors and in-order iteration.
//!
//! A [`Cursor`] records the path of nodes from the root down to its current
//! node. The tree keeps no parent links, so the path is what lets a cursor
//! climb back up when it runs off the end of a subtree. The end position is
//! the empty path.

use std::fmt;
use std::iter::FusedIterator;

use crate::arena::NodeId;
use crate::{OrderedTree, TreeError};

/// A position in an [`OrderedTree`], or one past its last key.
///
/// A cursor borrows the tree, so the tree cannot be modified while the
/// cursor is alive.
pub struct Cursor<'a, K, C> {
    tree: &'a OrderedTree<K, C>,
    path: Vec<NodeId>,
}

impl<'a, K, C> Cursor<'a, K, C> {
    pub(crate) fn new(tree: &'a OrderedTree<K, C>, path: Vec<NodeId>) -> Self {
        Self { tree, path }
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.path.is_empty()
    }

    /// The key under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<&'a K> {
        let tree = self.tree;
        self.path.last().map(|&id| &tree.nodes.node(id).key)
    }

    /// The key under the cursor. Dereferencing the end is an error.
    pub fn key(&self) -> Result<&'a K, TreeError> {
        self.get().ok_or(TreeError::CursorAtEnd)
    }

    /// Step to the in-order successor. Past the largest key the cursor
    /// becomes the end; at the end it stays there.
    pub fn move_next(&mut self) {
        let tree = self.tree;
        let nodes = &tree.nodes;
        let Some(&top) = self.path.last() else {
            return;
        };

        let mut child = nodes.node(top).right;
        if !child.is_null() {
            while !child.is_null() {
                self.path.push(child);
                child = nodes.node(child).left;
            }
            return;
        }

        // No right subtree: climb while we are coming up out of a right child.
        let mut from = self.path.pop();
        while let (Some(done), Some(&parent)) = (from, self.path.last()) {
            if nodes.node(parent).right != done {
                break;
            }
            from = self.path.pop();
        }
    }

    /// Step to the in-order predecessor. Before the smallest key the cursor
    /// becomes the end; at the end it stays there.
    pub fn move_prev(&mut self) {
        let tree = self.tree;
        let nodes = &tree.nodes;
        let Some(&top) = self.path.last() else {
            return;
        };

        let mut child = nodes.node(top).left;
        if !child.is_null() {
            while !child.is_null() {
                self.path.push(child);
                child = nodes.node(child).right;
            }
            return;
        }

        let mut from = self.path.pop();
        while let (Some(done), Some(&parent)) = (from, self.path.last()) {
            if nodes.node(parent).left != done {
                break;
            }
            from = self.path.pop();
        }
    }
}

impl<K, C> Clone for Cursor<'_, K, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            path: self.path.clone(),
        }
    }
}

/// Two cursors are equal when they walk the same tree and sit on the same
/// node. All end cursors of one tree are equal.
impl<K, C> PartialEq for Cursor<'_, K, C> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.path == other.path
    }
}

impl<K, C> Eq for Cursor<'_, K, C> {}

impl<K: fmt::Debug, C> fmt::Debug for Cursor<'_, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("key", &self.get())
            .field("depth", &self.path.len())
            .finish()
    }
}

/// Ascending iterator over the keys of an [`OrderedTree`].
pub struct Iter<'a, K, C> {
    front: Cursor<'a, K, C>,
    back: Cursor<'a, K, C>,
    remaining: usize,
}

impl<'a, K, C> Iter<'a, K, C> {
    pub(crate) fn new(tree: &'a OrderedTree<K, C>) -> Self {
        Self {
            front: tree.begin(),
            back: tree.reverse_begin(),
            remaining: tree.len(),
        }
    }
}

impl<'a, K, C> Iterator for Iter<'a, K, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.front.get()?;
        self.front.move_next();
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, C> DoubleEndedIterator for Iter<'_, K, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.back.get()?;
        self.back.move_prev();
        self.remaining -= 1;
        Some(key)
    }
}

impl<K, C> ExactSizeIterator for Iter<'_, K, C> {}

impl<K, C> FusedIterator for Iter<'_, K, C> {}

impl<K, C> Clone for Iter<'_, K, C> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}
