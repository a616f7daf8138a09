//! Node arena for AVL nodes.
//!
//! Nodes live in one `Vec` and refer to their children by [`NodeId`], a
//! stable slot index. Freed slots go on a free list and are handed out again
//! by later allocations, so ids never move while a node is live.

use std::collections::TryReserveError;

/// Index of a node slot.
///
/// Special: `usize::MAX` = NULL (the empty subtree).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const NULL: NodeId = NodeId(usize::MAX);

    #[inline]
    pub(crate) fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }

    #[inline]
    fn index(self) -> usize {
        debug_assert!(!self.is_null());
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    /// Edges on the longest downward path; a leaf is 0.
    pub(crate) height: i32,
    /// Nodes in this subtree, including this one.
    pub(crate) weight: usize,
}

#[derive(Clone)]
pub(crate) struct NodeArena<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<usize>,
}

impl<K> NodeArena<K> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Number of live nodes.
    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn memory_usage(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Option<Node<K>>>()
            + self.free.capacity() * std::mem::size_of::<usize>()
    }

    /// Make sure the next [`alloc`](Self::alloc) cannot reallocate.
    pub(crate) fn try_reserve(&mut self) -> Result<(), TryReserveError> {
        if self.free.is_empty() {
            self.slots.try_reserve(1)?;
        }
        Ok(())
    }

    /// Allocate a leaf holding `key`.
    pub(crate) fn alloc(&mut self, key: K) -> NodeId {
        let node = Node {
            key,
            left: NodeId::NULL,
            right: NodeId::NULL,
            height: 0,
            weight: 1,
        };
        if let Some(idx) = self.free.pop() {
            debug_assert!(self.slots[idx].is_none());
            self.slots[idx] = Some(node);
            NodeId(idx)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Release a node and hand back its key. Children are left untouched.
    pub(crate) fn free(&mut self, id: NodeId) -> K {
        let node = self.slots[id.index()]
            .take()
            .expect("freed node must be live");
        self.free.push(id.index());
        node.key
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K> {
        self.slots[id.index()]
            .as_ref()
            .expect("reachable node must be live")
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        self.slots[id.index()]
            .as_mut()
            .expect("reachable node must be live")
    }

    #[inline]
    pub(crate) fn height(&self, id: NodeId) -> i32 {
        if id.is_null() {
            -1
        } else {
            self.node(id).height
        }
    }

    #[inline]
    pub(crate) fn weight(&self, id: NodeId) -> usize {
        if id.is_null() {
            0
        } else {
            self.node(id).weight
        }
    }
}
