//! Arena storage for binomial forest nodes
//!
//! Nodes live in a flat `Vec` and refer to one another by [`NodeIdx`] instead of
//! pointers. Absence of a parent, child or sibling is an explicit
//! `Option<NodeIdx>`; because the index wraps a [`NonMaxUsize`], the option is
//! niche-packed and costs no more than a bare `usize`.
//!
//! # Design
//!
//! The arena only manages node metadata. Values are stored separately by the
//! forest and a node points at its value through `slot`. Released nodes are
//! reset to a vacant state and kept on a free list, so a heap that sees many
//! push/pop cycles never grows its node array past its peak population.

use nonmax::NonMaxUsize;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Index of a node in a [`NodeArena`]
///
/// `usize::MAX` is not representable, which gives `Option<NodeIdx>` the same
/// size as `usize`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(NonMaxUsize);

impl NodeIdx {
    /// Creates an index from a raw position
    ///
    /// # Panics
    /// Panics if `index == usize::MAX`. A `Vec<Node>` can never grow that large.
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        NodeIdx(NonMaxUsize::new(index).expect("node arena cannot hold usize::MAX nodes"))
    }

    /// Returns the raw position in the arena
    #[inline]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Debug for NodeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.get())
    }
}

/// Link structure of one binomial tree node
///
/// `degree` is the number of direct children. Children hang off `child` and are
/// chained through `sibling` in decreasing degree order; the same `sibling`
/// field chains roots in the root list (increasing degree order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    /// Position of this node's value in the forest's value array
    pub(crate) slot: usize,
    pub(crate) parent: Option<NodeIdx>,
    /// First (highest-degree) child
    pub(crate) child: Option<NodeIdx>,
    /// Next node to the right: next lower-degree sibling, or next root
    pub(crate) sibling: Option<NodeIdx>,
    pub(crate) degree: usize,
}

impl Node {
    fn singleton(slot: usize) -> Self {
        Node {
            slot,
            parent: None,
            child: None,
            sibling: None,
            degree: 0,
        }
    }
}

/// Flat node storage with a free list
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
    free: Vec<NodeIdx>,
    /// `vacant[i]` is true exactly when node `i` is on `free`
    vacant: Vec<bool>,
}

impl NodeArena {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            vacant: Vec::with_capacity(capacity),
        }
    }

    /// Allocates a degree-0 node owning `slot`, reusing a vacant node if any
    pub(crate) fn alloc(&mut self, slot: usize) -> NodeIdx {
        match self.free.pop() {
            Some(idx) => {
                tracing::trace!(node = ?idx, slot, "recycling vacant node");
                self[idx] = Node::singleton(slot);
                self.vacant[idx.get()] = false;
                idx
            }
            None => {
                let idx = NodeIdx::new(self.nodes.len());
                self.nodes.push(Node::singleton(slot));
                self.vacant.push(false);
                idx
            }
        }
    }

    /// Invalidates a node's links and makes it available to `alloc`
    ///
    /// The caller must have detached the node from every tree and list first.
    pub(crate) fn release(&mut self, idx: NodeIdx) {
        self[idx] = Node::singleton(0);
        self.vacant[idx.get()] = true;
        self.free.push(idx);
    }

    /// Number of live (non-vacant) nodes
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Total nodes ever allocated and not reclaimed by `clear`
    pub(crate) fn allocated(&self) -> usize {
        self.nodes.len()
    }

    /// True if the node is on the free list. O(1).
    #[inline]
    pub(crate) fn is_vacant(&self, idx: NodeIdx) -> bool {
        self.vacant[idx.get()]
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        let grow = additional.saturating_sub(self.free.len());
        self.nodes.reserve(grow);
        self.vacant.reserve(grow);
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.vacant.clear();
    }
}

impl Index<NodeIdx> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.get()]
    }
}

impl IndexMut<NodeIdx> for NodeArena {
    #[inline]
    fn index_mut(&mut self, idx: NodeIdx) -> &mut Node {
        &mut self.nodes[idx.get()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_index_is_niche_packed() {
        assert_eq!(
            std::mem::size_of::<Option<NodeIdx>>(),
            std::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_alloc_sequential() {
        let mut arena = NodeArena::default();
        let a = arena.alloc(0);
        let b = arena.alloc(1);

        assert_eq!(a.get(), 0);
        assert_eq!(b.get(), 1);
        assert_eq!(arena[b].slot, 1);
        assert_eq!(arena[b].degree, 0);
        assert_eq!(arena.live(), 2);
    }

    #[test]
    fn test_release_recycles_node() {
        let mut arena = NodeArena::default();
        let a = arena.alloc(0);
        let _b = arena.alloc(1);

        arena[a].degree = 3;
        arena.release(a);
        assert!(arena.is_vacant(a));
        assert_eq!(arena.live(), 1);

        let c = arena.alloc(7);
        assert_eq!(c, a);
        assert!(!arena.is_vacant(c));
        assert_eq!(arena[c].slot, 7);
        assert_eq!(arena[c].degree, 0);
        assert_eq!(arena.allocated(), 2);
    }

    #[test]
    fn test_vacancy_tracks_free_list() {
        let mut arena = NodeArena::default();
        let nodes: Vec<NodeIdx> = (0..64).map(|slot| arena.alloc(slot)).collect();
        for &idx in nodes.iter().step_by(2) {
            arena.release(idx);
        }

        for (i, &idx) in nodes.iter().enumerate() {
            assert_eq!(arena.is_vacant(idx), i % 2 == 0);
        }
        assert_eq!(arena.live(), 32);

        // Reallocating drains the free list and clears every flag
        for slot in 0..32 {
            arena.alloc(slot);
        }
        assert!(nodes.iter().all(|&idx| !arena.is_vacant(idx)));
        assert_eq!(arena.allocated(), 64);
    }

    #[test]
    fn test_clear() {
        let mut arena = NodeArena::with_capacity(4);
        let a = arena.alloc(0);
        arena.release(a);
        arena.clear();
        assert_eq!(arena.live(), 0);
        assert_eq!(arena.allocated(), 0);
    }
}
