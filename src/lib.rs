//! # avl-rank
//!
//! An ordered set on a weight-augmented AVL tree.
//!
//! Every node caches its height and the size of its subtree ("weight"), so
//! membership, insertion, removal and k-th smallest queries all run in
//! O(log n). Cursors walk the tree in both directions without parent links.
//!
//! ## Example
//!
//! ```rust
//! use avl_rank::OrderedTree;
//!
//! let mut tree = OrderedTree::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(key);
//! }
//!
//! assert_eq!(tree.len(), 7);
//! assert_eq!(tree.k_order_statistic(4), Ok(&5));
//! assert_eq!(tree.to_string(), "1 3 4 5 7 8 9");
//!
//! tree.remove(&5);
//! assert!(!tree.contains(&5));
//! assert_eq!(tree.in_order(), vec![&1, &3, &4, &7, &8, &9]);
//! ```

mod arena;
mod compare;
mod cursor;
mod error;

use std::cmp::Ordering;
use std::fmt;

use arena::{NodeArena, NodeId};

pub use compare::{Compare, LessThan, NaturalOrder};
pub use cursor::{Cursor, Iter};
pub use error::TreeError;

// =============================================================================
// OrderedTree
// =============================================================================

/// An ordered set of unique keys, balanced as an AVL tree.
///
/// Keys are ordered by `C`, which defaults to the key type's [`Ord`].
/// Inserting a key that is already present leaves the tree unchanged.
#[derive(Clone)]
pub struct OrderedTree<K, C = NaturalOrder> {
    nodes: NodeArena<K>,
    root: NodeId,
    cmp: C,
}

impl<K: Ord> OrderedTree<K> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// An empty tree with room for `capacity` nodes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: NodeArena::with_capacity(capacity),
            root: NodeId::NULL,
            cmp: NaturalOrder,
        }
    }
}

impl<K, C> OrderedTree<K, C> {
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.weight(self.root)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    /// Height of the root in edges: `-1` when empty, `0` for a single key.
    pub fn height(&self) -> i32 {
        self.nodes.height(self.root)
    }

    /// Bytes held by the node arena, including free slots.
    pub fn memory_usage(&self) -> usize {
        self.nodes.memory_usage()
    }

    /// The comparator this tree orders keys with.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Drop every key and reset to empty.
    pub fn clear(&mut self) {
        log::debug!("clearing tree of {} keys", self.len());
        self.nodes.clear();
        self.root = NodeId::NULL;
    }

    pub fn first(&self) -> Option<&K> {
        self.begin().get()
    }

    pub fn last(&self) -> Option<&K> {
        self.reverse_begin().get()
    }

    /// The `rank`-th smallest key, counting from 1.
    ///
    /// Ranks outside `1..=len()` (every rank, on an empty tree) are an error.
    pub fn k_order_statistic(&self, rank: usize) -> Result<&K, TreeError> {
        let len = self.len();
        if rank == 0 || rank > len {
            return Err(TreeError::RankOutOfRange { rank, len });
        }

        let mut node = self.root;
        let mut order = rank;
        loop {
            let n = self.nodes.node(node);
            let weight_left = self.nodes.weight(n.left);
            match order.cmp(&(weight_left + 1)) {
                Ordering::Equal => return Ok(&n.key),
                Ordering::Less => node = n.left,
                Ordering::Greater => {
                    order -= weight_left + 1;
                    node = n.right;
                }
            }
        }
    }

    /// Cursor at the smallest key, or the end when empty.
    pub fn begin(&self) -> Cursor<'_, K, C> {
        self.spine(|n| n.left)
    }

    /// Cursor at the largest key, or the end when empty.
    pub fn reverse_begin(&self) -> Cursor<'_, K, C> {
        self.spine(|n| n.right)
    }

    /// The position one past the largest key.
    pub fn end(&self) -> Cursor<'_, K, C> {
        Cursor::new(self, Vec::new())
    }

    pub fn iter(&self) -> Iter<'_, K, C> {
        Iter::new(self)
    }

    /// Snapshot of every key in ascending order.
    pub fn in_order(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_in_order(self.root, &mut out);
        out
    }

    fn collect_in_order<'a>(&'a self, node: NodeId, out: &mut Vec<&'a K>) {
        if node.is_null() {
            return;
        }
        let n = self.nodes.node(node);
        self.collect_in_order(n.left, out);
        out.push(&n.key);
        self.collect_in_order(n.right, out);
    }

    fn spine(&self, step: impl Fn(&arena::Node<K>) -> NodeId) -> Cursor<'_, K, C> {
        let mut path = Vec::with_capacity(self.path_capacity());
        let mut node = self.root;
        while !node.is_null() {
            path.push(node);
            node = step(self.nodes.node(node));
        }
        Cursor::new(self, path)
    }

    #[inline]
    fn path_capacity(&self) -> usize {
        (self.height() + 1).max(0) as usize
    }

    // =========================================================================
    // Height, weight and rotations
    // =========================================================================

    /// Recompute cached height and weight from the children.
    fn update(&mut self, id: NodeId) {
        let n = self.nodes.node(id);
        let (left, right) = (n.left, n.right);
        let height = self.nodes.height(left).max(self.nodes.height(right)) + 1;
        let weight = self.nodes.weight(left) + self.nodes.weight(right) + 1;
        let n = self.nodes.node_mut(id);
        n.height = height;
        n.weight = weight;
    }

    /// `height(left) - height(right)`.
    fn balance_factor(&self, id: NodeId) -> i32 {
        let n = self.nodes.node(id);
        self.nodes.height(n.left) - self.nodes.height(n.right)
    }

    /// Promote the right child of `root`. Returns the new subtree root.
    fn rotate_left(&mut self, root: NodeId) -> NodeId {
        let pivot = self.nodes.node(root).right;
        debug_assert!(!pivot.is_null());
        let inner = self.nodes.node(pivot).left;
        self.nodes.node_mut(root).right = inner;
        self.nodes.node_mut(pivot).left = root;
        self.update(root);
        self.update(pivot);
        log::trace!("rotate left: {root:?} -> {pivot:?}");
        pivot
    }

    /// Promote the left child of `root`. Returns the new subtree root.
    fn rotate_right(&mut self, root: NodeId) -> NodeId {
        let pivot = self.nodes.node(root).left;
        debug_assert!(!pivot.is_null());
        let inner = self.nodes.node(pivot).right;
        self.nodes.node_mut(root).left = inner;
        self.nodes.node_mut(pivot).right = root;
        self.update(root);
        self.update(pivot);
        log::trace!("rotate right: {root:?} -> {pivot:?}");
        pivot
    }

    /// Refresh `id` after one of its subtrees changed and restore the AVL
    /// balance with at most two rotations. Returns the new subtree root.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.update(id);
        match self.balance_factor(id) {
            2 => {
                let left = self.nodes.node(id).left;
                if self.balance_factor(left) < 0 {
                    let left = self.rotate_left(left);
                    self.nodes.node_mut(id).left = left;
                }
                self.rotate_right(id)
            }
            -2 => {
                let right = self.nodes.node(id).right;
                if self.balance_factor(right) > 0 {
                    let right = self.rotate_right(right);
                    self.nodes.node_mut(id).right = right;
                }
                self.rotate_left(id)
            }
            bf => {
                debug_assert!(bf.abs() <= 1, "balance factor {bf} after update");
                id
            }
        }
    }

    /// Unlink the leftmost node under `node`, rebalancing on the way back up.
    /// Returns `(new subtree root, detached node)`.
    fn detach_min(&mut self, node: NodeId) -> (NodeId, NodeId) {
        let left = self.nodes.node(node).left;
        if left.is_null() {
            return (self.nodes.node(node).right, node);
        }
        let (left, min) = self.detach_min(left);
        self.nodes.node_mut(node).left = left;
        (self.rebalance(node), min)
    }
}

impl<K, C: Compare<K>> OrderedTree<K, C> {
    /// An empty tree ordered by `cmp`.
    ///
    /// ```rust
    /// use avl_rank::OrderedTree;
    ///
    /// let mut tree: OrderedTree<i32, _> =
    ///     OrderedTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// tree.extend([1, 2, 3]);
    /// assert_eq!(tree.first(), Some(&3));
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            nodes: NodeArena::new(),
            root: NodeId::NULL,
            cmp,
        }
    }

    fn find(&self, key: &K) -> NodeId {
        let mut node = self.root;
        while !node.is_null() {
            let n = self.nodes.node(node);
            node = match self.cmp.compare(key, &n.key) {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => return node,
            };
        }
        NodeId::NULL
    }

    pub fn contains(&self, key: &K) -> bool {
        !self.find(key).is_null()
    }

    /// The stored key equal to `key`.
    pub fn get(&self, key: &K) -> Option<&K> {
        let node = self.find(key);
        (!node.is_null()).then(|| &self.nodes.node(node).key)
    }

    /// Insert `key` and return a cursor at it. If an equal key is already
    /// stored, the tree is unchanged, `key` is dropped and the cursor points
    /// at the stored key.
    pub fn insert(&mut self, key: K) -> Cursor<'_, K, C> {
        let (root, target) = self.insert_at(self.root, key);
        self.root = root;
        self.cursor_at(target)
    }

    /// Like [`insert`](Self::insert), but reports allocation failure instead
    /// of aborting. On error the tree is unchanged.
    pub fn try_insert(&mut self, key: K) -> Result<Cursor<'_, K, C>, TreeError> {
        self.nodes.try_reserve()?;
        Ok(self.insert(key))
    }

    /// Returns `(new subtree root, node holding the key)`.
    fn insert_at(&mut self, node: NodeId, key: K) -> (NodeId, NodeId) {
        if node.is_null() {
            let leaf = self.nodes.alloc(key);
            return (leaf, leaf);
        }
        let n = self.nodes.node(node);
        let (left, right) = (n.left, n.right);
        match self.cmp.compare(&key, &n.key) {
            Ordering::Less => {
                let (left, target) = self.insert_at(left, key);
                self.nodes.node_mut(node).left = left;
                (self.rebalance(node), target)
            }
            Ordering::Greater => {
                let (right, target) = self.insert_at(right, key);
                self.nodes.node_mut(node).right = right;
                (self.rebalance(node), target)
            }
            Ordering::Equal => (node, node),
        }
    }

    /// Cursor at a live node, with the path re-derived from the root.
    fn cursor_at(&self, target: NodeId) -> Cursor<'_, K, C> {
        let key = &self.nodes.node(target).key;
        let mut path = Vec::with_capacity(self.path_capacity());
        let mut node = self.root;
        while !node.is_null() {
            path.push(node);
            let n = self.nodes.node(node);
            node = match self.cmp.compare(key, &n.key) {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => break,
            };
        }
        debug_assert_eq!(path.last(), Some(&target));
        Cursor::new(self, path)
    }

    /// Remove the key equal to `key` and return it, or `None` if absent.
    pub fn remove(&mut self, key: &K) -> Option<K> {
        let (root, removed) = self.remove_at(self.root, key);
        self.root = root;
        removed
    }

    /// Returns `(new subtree root, removed key)`.
    fn remove_at(&mut self, node: NodeId, key: &K) -> (NodeId, Option<K>) {
        if node.is_null() {
            return (node, None);
        }
        let n = self.nodes.node(node);
        let (left, right) = (n.left, n.right);
        match self.cmp.compare(key, &n.key) {
            Ordering::Less => {
                let (left, removed) = self.remove_at(left, key);
                if removed.is_none() {
                    return (node, None);
                }
                self.nodes.node_mut(node).left = left;
                (self.rebalance(node), removed)
            }
            Ordering::Greater => {
                let (right, removed) = self.remove_at(right, key);
                if removed.is_none() {
                    return (node, None);
                }
                self.nodes.node_mut(node).right = right;
                (self.rebalance(node), removed)
            }
            Ordering::Equal if left.is_null() || right.is_null() => {
                let child = if left.is_null() { right } else { left };
                (child, Some(self.nodes.free(node)))
            }
            Ordering::Equal => {
                let (right, successor) = self.detach_min(right);
                log::trace!("replacing {node:?} with in-order successor {successor:?}");
                let s = self.nodes.node_mut(successor);
                s.left = left;
                s.right = right;
                let removed = self.nodes.free(node);
                (self.rebalance(successor), Some(removed))
            }
        }
    }
}

impl<K: Ord> Default for OrderedTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, C> fmt::Debug for OrderedTree<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Keys in ascending order, separated by single spaces.
impl<K: fmt::Display, C> fmt::Display for OrderedTree<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl<K: Ord> FromIterator<K> for OrderedTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K, C: Compare<K>> Extend<K> for OrderedTree<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K, C> IntoIterator for &'a OrderedTree<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


#[cfg(test)]
mod proptests;
