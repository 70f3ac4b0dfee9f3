//! Array-backed binomial forest shared by both heap variants
//!
//! The forest owns three flat arrays:
//!
//! - `values`: the stored values, dense and in no particular order
//! - `owners`: for each value slot, the node that owns it
//! - `nodes`: link metadata (parent, first child, right sibling, degree, slot)
//!
//! Node and slot are separate resources joined by a bijection that is kept in
//! both directions (`node.slot` and `owners[slot]`). Removing a value moves the
//! last value into the freed slot, so exactly one node has to be re-pointed.
//!
//! # Algorithm Overview
//!
//! Roots are chained through `sibling` starting at `head`, in increasing
//! degree. Inserting or extracting merges a second root list into this one and
//! then links equal-degree roots pairwise, like carry propagation in binary
//! addition, until at most one root of each degree remains. `top` caches a
//! root holding a least value.
//!
//! **Equal values**: when two roots are linked and neither is strictly less,
//! the one met first in the root list stays parent. When the top is
//! recomputed, a later root takes over unless it is strictly greater. These
//! rules do not change what the heaps return, only which of several equal
//! values sits on top, and they make tree shapes reproducible.

use crate::compare::Compare;
use crate::storage::{NodeArena, NodeIdx};
use std::fmt;
use thiserror::Error;

/// A broken structural rule found by `check_invariants`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The value array and the slot owner map disagree in length
    #[error("{values} values but {owners} slot owners")]
    OwnerCount { values: usize, owners: usize },
    /// The number of live nodes differs from the number of values
    #[error("{live} live nodes for {values} values")]
    NodeCount { live: usize, values: usize },
    /// A slot's owner does not point back at the slot
    #[error("slot {slot} is owned by node {node}, which points at slot {points_at}")]
    SlotMismatch {
        slot: usize,
        node: usize,
        points_at: usize,
    },
    /// A slot is owned by a node on the free list
    #[error("slot {slot} is owned by vacant node {node}")]
    VacantOwner { slot: usize, node: usize },
    /// Two consecutive roots are not in strictly increasing degree order
    #[error("root of degree {next} follows root of degree {previous}")]
    RootOrder { previous: usize, next: usize },
    /// A root has a parent link
    #[error("root {node} has a parent")]
    RootWithParent { node: usize },
    /// The cached top is missing, not a root, or not a least root
    #[error("cached top {top:?} is not a least root")]
    StaleTop { top: Option<usize> },
    /// A node's degree differs from its child count
    #[error("node {node} has degree {degree} but {children} children")]
    DegreeMismatch {
        node: usize,
        degree: usize,
        children: usize,
    },
    /// Children are not ordered k-1, k-2, ..., 0
    #[error("child {child} of node {node} has degree {found}, expected {expected}")]
    ChildDegree {
        node: usize,
        child: usize,
        expected: usize,
        found: usize,
    },
    /// A child does not link back to its parent
    #[error("child {child} of node {node} has the wrong parent link")]
    ParentLink { node: usize, child: usize },
    /// A child orders strictly before its parent
    #[error("child {child} orders before its parent {node}")]
    HeapOrder { node: usize, child: usize },
    /// The trees do not cover every value exactly once
    #[error("trees reach {reached} nodes but the heap holds {values} values")]
    Unreachable { reached: usize, values: usize },
    /// The identity index does not map every stored value to its node
    #[error("identity index tracks {tracked} values for {values} stored, or points at the wrong node")]
    StaleIdentity { tracked: usize, values: usize },
}

/// The binomial forest: values, nodes, and the root list over them
#[derive(Debug, Clone)]
pub(crate) struct Forest<T, C> {
    values: Vec<T>,
    /// `owners[slot]` is the node whose `slot` field equals `slot`
    owners: Vec<NodeIdx>,
    nodes: NodeArena,
    /// First root; roots are chained through `sibling` in increasing degree
    head: Option<NodeIdx>,
    /// A root holding a least value
    top: Option<NodeIdx>,
    cmp: C,
}

impl<T, C: Compare<T>> Forest<T, C> {
    pub(crate) fn new(cmp: C) -> Self {
        Self::with_capacity(0, cmp)
    }

    pub(crate) fn with_capacity(capacity: usize, cmp: C) -> Self {
        Forest {
            values: Vec::with_capacity(capacity),
            owners: Vec::with_capacity(capacity),
            nodes: NodeArena::with_capacity(capacity),
            head: None,
            top: None,
            cmp,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        tracing::trace!(additional, len = self.len(), "reserving forest capacity");
        self.values.reserve(additional);
        self.owners.reserve(additional);
        self.nodes.reserve(additional);
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
        self.owners.clear();
        self.nodes.clear();
        self.head = None;
        self.top = None;
    }

    #[inline]
    pub(crate) fn comparator(&self) -> &C {
        &self.cmp
    }

    /// The stored values in slot order
    #[inline]
    pub(crate) fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub(crate) fn value(&self, node: NodeIdx) -> &T {
        &self.values[self.nodes[node].slot]
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<&T> {
        self.top.map(|top| self.value(top))
    }

    /// True if the value at `a` orders strictly before the value at `b`
    #[inline]
    fn less(&self, a: NodeIdx, b: NodeIdx) -> bool {
        self.cmp.less(self.value(a), self.value(b))
    }

    /// Inserts a value as a new degree-0 tree and returns its node
    ///
    /// **Time Complexity**: O(log n) worst-case, from carry propagation in `union`
    pub(crate) fn push(&mut self, value: T) -> NodeIdx {
        let slot = self.values.len();
        self.values.push(value);
        let node = self.nodes.alloc(slot);
        self.owners.push(node);

        match self.top {
            None => {
                self.head = Some(node);
                self.top = Some(node);
            }
            Some(_) => {
                self.union(Some(node));
                // Linking may have moved the top, so re-read it
                if let Some(top) = self.top {
                    if self.nodes[node].parent.is_none() && !self.less(top, node) {
                        self.top = Some(node);
                    }
                }
            }
        }

        self.after_mutation();
        node
    }

    /// Removes the top value and returns it
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**:
    /// 1. Detach the top's children, reversing them into a root list
    ///    (children are stored highest degree first, root lists lowest first)
    /// 2. Unlink the top from the root list
    /// 3. Union the children back in
    /// 4. Move the last value into the freed slot and re-point its node
    /// 5. Recycle the top's node and rescan the roots for the new top
    pub(crate) fn pop(&mut self) -> Option<T> {
        let top = self.top.take()?;

        let mut children = None;
        let mut cursor = self.nodes[top].child.take();
        while let Some(child) = cursor {
            let node = &mut self.nodes[child];
            cursor = node.sibling;
            node.parent = None;
            node.sibling = children;
            children = Some(child);
        }

        self.unlink_root(top);
        self.union(children);

        let value = self.release(top);
        self.top = self.get_new_top();

        self.after_mutation();
        Some(value)
    }

    /// Stores `value` at `node` and sifts it toward the root
    ///
    /// While the parent is not strictly less than the new value, the two
    /// values trade places; node links never change. `moved` is told about
    /// every displaced value and the node it now lives at. Returns the node the
    /// new value came to rest at together with the value it replaced.
    ///
    /// The caller must ensure `value` does not order after the value it
    /// replaces.
    ///
    /// **Time Complexity**: O(log n), the height of a binomial tree
    pub(crate) fn replace_and_sift_up(
        &mut self,
        node: NodeIdx,
        value: T,
        mut moved: impl FnMut(&T, NodeIdx),
    ) -> (NodeIdx, T) {
        let slot = self.nodes[node].slot;
        let previous = std::mem::replace(&mut self.values[slot], value);

        let mut current = node;
        let mut swaps = 0usize;
        while let Some(parent) = self.nodes[current].parent {
            if self.less(parent, current) {
                break;
            }
            let here = self.nodes[current].slot;
            self.values.swap(here, self.nodes[parent].slot);
            moved(&self.values[here], current);
            current = parent;
            swaps += 1;
        }
        tracing::trace!(swaps, "sifted updated value");

        if self.nodes[current].parent.is_none() {
            if let Some(top) = self.top {
                if !self.less(top, current) {
                    self.top = Some(current);
                }
            }
        }

        self.after_mutation();
        (current, previous)
    }

    /// Splices a root list into this one, ordered by degree
    ///
    /// A stable two-pointer merge. On equal degree the incoming root goes
    /// first. No values are compared.
    fn merge(&mut self, other: Option<NodeIdx>) {
        let mut mine = self.head;
        let mut theirs = other;
        let mut head = None;
        let mut tail: Option<NodeIdx> = None;

        loop {
            let next = match (mine, theirs) {
                (None, None) => break,
                (Some(a), Some(b)) if self.nodes[a].degree < self.nodes[b].degree => {
                    mine = self.nodes[a].sibling;
                    a
                }
                (Some(a), None) => {
                    mine = self.nodes[a].sibling;
                    a
                }
                (_, Some(b)) => {
                    theirs = self.nodes[b].sibling;
                    b
                }
            };

            match tail {
                None => head = Some(next),
                Some(last) => self.nodes[last].sibling = Some(next),
            }
            tail = Some(next);
        }

        self.head = head;
    }

    /// Merges a root list in, then links roots until degrees are unique
    ///
    /// **Algorithm**: scan with `prev`, `x`, `next`. Move on if `x` and `next`
    /// differ in degree, or if a third root of the same degree follows `next`
    /// (that pair is linked on the next step instead). Otherwise link the two:
    /// the one that is not strictly less becomes a child of the other.
    fn union(&mut self, other: Option<NodeIdx>) {
        self.merge(other);

        let Some(mut x) = self.head else {
            return;
        };
        let mut prev: Option<NodeIdx> = None;
        let mut links = 0usize;

        while let Some(next) = self.nodes[x].sibling {
            let degree = self.nodes[x].degree;
            let skip = self.nodes[next].degree != degree
                || self.nodes[next]
                    .sibling
                    .is_some_and(|after| self.nodes[after].degree == degree);

            if skip {
                prev = Some(x);
                x = next;
            } else if !self.less(next, x) {
                self.nodes[x].sibling = self.nodes[next].sibling;
                self.link(next, x);
                links += 1;
            } else {
                match prev {
                    None => self.head = Some(next),
                    Some(p) => self.nodes[p].sibling = Some(next),
                }
                self.link(x, next);
                x = next;
                links += 1;
            }
        }

        tracing::trace!(links, "union complete");
    }

    /// Makes `child` the first child of `parent`
    ///
    /// Both must be roots of equal degree, and `child` must not order before
    /// `parent`. The caller has already unlinked `child` from the root list.
    fn link(&mut self, child: NodeIdx, parent: NodeIdx) {
        let first = self.nodes[parent].child;
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.sibling = first;

        let node = &mut self.nodes[parent];
        node.child = Some(child);
        node.degree += 1;

        // The parent is never greater, so it can stand in as top
        if self.top == Some(child) {
            self.top = Some(parent);
        }
    }

    /// Removes a root from the root list
    fn unlink_root(&mut self, root: NodeIdx) {
        let after = self.nodes[root].sibling.take();
        if self.head == Some(root) {
            self.head = after;
            return;
        }

        let mut cursor = self.head;
        while let Some(current) = cursor {
            if self.nodes[current].sibling == Some(root) {
                self.nodes[current].sibling = after;
                return;
            }
            cursor = self.nodes[current].sibling;
        }
    }

    /// Frees a detached node and its slot, compacting the value array
    fn release(&mut self, node: NodeIdx) -> T {
        let slot = self.nodes[node].slot;
        let value = self.values.swap_remove(slot);
        self.owners.swap_remove(slot);

        // The last value (if it was not ours) now lives in `slot`
        if let Some(&migrated) = self.owners.get(slot) {
            self.nodes[migrated].slot = slot;
        }

        self.nodes.release(node);
        value
    }

    /// Scans the root list for a least root
    ///
    /// **Time Complexity**: O(log n), the number of roots
    fn get_new_top(&self) -> Option<NodeIdx> {
        let mut best = self.head?;
        let mut cursor = self.nodes[best].sibling;
        while let Some(root) = cursor {
            if !self.less(best, root) {
                best = root;
            }
            cursor = self.nodes[root].sibling;
        }
        Some(best)
    }

    #[inline]
    fn after_mutation(&self) {
        #[cfg(feature = "check-invariants")]
        {
            if let Err(violation) = self.check_invariants() {
                panic!("binomial forest corrupted: {violation}");
            }
        }
    }

    /// Verifies every structural invariant of the forest
    ///
    /// Checks the slot/node bijection, root list order, the top cache, binomial
    /// tree shape and heap order. O(n).
    pub(crate) fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.owners.len() != self.values.len() {
            return Err(InvariantViolation::OwnerCount {
                values: self.values.len(),
                owners: self.owners.len(),
            });
        }
        if self.nodes.live() != self.values.len() {
            return Err(InvariantViolation::NodeCount {
                live: self.nodes.live(),
                values: self.values.len(),
            });
        }
        for (slot, &node) in self.owners.iter().enumerate() {
            if self.nodes.is_vacant(node) {
                return Err(InvariantViolation::VacantOwner {
                    slot,
                    node: node.get(),
                });
            }
            let points_at = self.nodes[node].slot;
            if points_at != slot {
                return Err(InvariantViolation::SlotMismatch {
                    slot,
                    node: node.get(),
                    points_at,
                });
            }
        }

        let mut reached = 0usize;
        let mut previous: Option<usize> = None;
        let mut cursor = self.head;
        let mut top_is_root = false;
        while let Some(root) = cursor {
            let node = &self.nodes[root];
            if node.parent.is_some() {
                return Err(InvariantViolation::RootWithParent { node: root.get() });
            }
            if let Some(previous) = previous {
                if node.degree <= previous {
                    return Err(InvariantViolation::RootOrder {
                        previous,
                        next: node.degree,
                    });
                }
            }
            if let Some(top) = self.top {
                top_is_root |= top == root;
                if self.less(root, top) {
                    return Err(InvariantViolation::StaleTop {
                        top: Some(top.get()),
                    });
                }
            }
            previous = Some(node.degree);
            reached += self.check_tree(root)?;
            if reached > self.values.len() {
                break;
            }
            cursor = node.sibling;
        }

        if self.top.is_some() != self.head.is_some() || (self.top.is_some() && !top_is_root) {
            return Err(InvariantViolation::StaleTop {
                top: self.top.map(NodeIdx::get),
            });
        }
        if reached != self.values.len() {
            return Err(InvariantViolation::Unreachable {
                reached,
                values: self.values.len(),
            });
        }
        Ok(())
    }

    /// Checks one binomial tree and returns its node count
    fn check_tree(&self, root: NodeIdx) -> Result<usize, InvariantViolation> {
        let mut count = 0usize;
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            count += 1;
            if count > self.nodes.allocated() {
                break;
            }
            let degree = self.nodes[node].degree;
            let mut children = 0usize;
            let mut cursor = self.nodes[node].child;

            while let Some(child) = cursor {
                let expected = degree.saturating_sub(children + 1);
                let found = self.nodes[child].degree;
                if children >= degree || found != expected {
                    return Err(InvariantViolation::ChildDegree {
                        node: node.get(),
                        child: child.get(),
                        expected,
                        found,
                    });
                }
                if self.nodes[child].parent != Some(node) {
                    return Err(InvariantViolation::ParentLink {
                        node: node.get(),
                        child: child.get(),
                    });
                }
                if self.less(child, node) {
                    return Err(InvariantViolation::HeapOrder {
                        node: node.get(),
                        child: child.get(),
                    });
                }
                stack.push(child);
                children += 1;
                cursor = self.nodes[child].sibling;
            }

            if children != degree {
                return Err(InvariantViolation::DegreeMismatch {
                    node: node.get(),
                    degree,
                    children,
                });
            }
        }

        Ok(count)
    }
}

impl<T: fmt::Display, C> Forest<T, C> {
    fn fmt_tree(&self, node: NodeIdx, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values[self.nodes[node].slot])?;
        let mut cursor = self.nodes[node].child;
        if cursor.is_none() {
            return Ok(());
        }

        f.write_str("(")?;
        let mut first = true;
        while let Some(child) = cursor {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            self.fmt_tree(child, f)?;
            cursor = self.nodes[child].sibling;
        }
        f.write_str(")")
    }
}

/// One binomial tree per line, root list order: `root(child child ...)`
impl<T: fmt::Display, C> fmt::Display for Forest<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cursor = self.head;
        let mut first = true;
        while let Some(root) = cursor {
            if !first {
                f.write_str("\n")?;
            }
            first = false;
            self.fmt_tree(root, f)?;
            cursor = self.nodes[root].sibling;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{KeyComparator, MinComparator};

    fn forest_of(values: &[i32]) -> Forest<i32, MinComparator> {
        let mut forest = Forest::new(MinComparator);
        for &v in values {
            forest.push(v);
            forest.check_invariants().unwrap();
        }
        forest
    }

    fn root_degrees<T, C: Compare<T>>(forest: &Forest<T, C>) -> Vec<usize> {
        let mut degrees = Vec::new();
        let mut cursor = forest.head;
        while let Some(root) = cursor {
            degrees.push(forest.nodes[root].degree);
            cursor = forest.nodes[root].sibling;
        }
        degrees
    }

    #[test]
    fn test_root_list_mirrors_binary_length() {
        // 13 = 0b1101: trees of order 0, 2 and 3
        let forest = forest_of(&(0..13).collect::<Vec<_>>());
        assert_eq!(root_degrees(&forest), vec![0, 2, 3]);

        let forest = forest_of(&(0..16).collect::<Vec<_>>());
        assert_eq!(root_degrees(&forest), vec![4]);
    }

    #[test]
    fn test_pop_compacts_values() {
        let mut forest = forest_of(&[5, 3, 8, 1, 9, 2]);
        assert_eq!(forest.pop(), Some(1));
        forest.check_invariants().unwrap();
        assert_eq!(forest.values().len(), 5);
        assert_eq!(forest.owners.len(), 5);
        assert_eq!(forest.nodes.live(), 5);

        let mut rest: Vec<i32> = forest.values().to_vec();
        rest.sort();
        assert_eq!(rest, vec![2, 3, 5, 8, 9]);
    }

    #[test]
    fn test_nodes_are_recycled() {
        let mut forest = forest_of(&[4, 2, 7]);
        for v in 0..100 {
            forest.push(v);
            forest.pop();
            forest.check_invariants().unwrap();
        }
        assert!(forest.nodes.allocated() <= 4);
    }

    #[test]
    fn test_equal_keys_keep_top_on_a_root() {
        let mut forest = forest_of(&[5, 5, 5, 5, 5]);
        forest.check_invariants().unwrap();
        for _ in 0..5 {
            assert_eq!(forest.pop(), Some(5));
            forest.check_invariants().unwrap();
        }
        assert_eq!(forest.pop(), None);
    }

    #[test]
    fn test_first_encountered_root_stays_parent() {
        // Equal keys, distinct payloads: the incoming singleton is met first
        let mut forest = Forest::new(KeyComparator(|p: &(u32, char)| p.0));
        forest.push((1, 'a'));
        forest.push((1, 'b'));
        forest.check_invariants().unwrap();

        let root = forest.head.unwrap();
        assert_eq!(forest.value(root), &(1, 'b'));
        assert_eq!(forest.nodes[root].degree, 1);
        assert_eq!(forest.peek(), Some(&(1, 'b')));

        assert_eq!(forest.pop(), Some((1, 'b')));
        assert_eq!(forest.peek(), Some(&(1, 'a')));
    }

    #[test]
    fn test_sift_up_reports_moves() {
        let mut forest = forest_of(&[10, 20, 30, 40]);
        // Find the node holding 40, the deepest value
        let deep = forest
            .owners
            .iter()
            .copied()
            .find(|&n| *forest.value(n) == 40)
            .unwrap();

        let mut moves = Vec::new();
        let (rest, previous) = forest.replace_and_sift_up(deep, 1, |v, n| moves.push((*v, n)));
        assert_eq!(previous, 40);
        assert_eq!(*forest.value(rest), 1);
        assert_eq!(forest.peek(), Some(&1));
        assert!(!moves.is_empty());
        for (v, n) in moves {
            assert_eq!(*forest.value(n), v);
        }
        forest.check_invariants().unwrap();
    }

    #[test]
    fn test_display_renders_trees() {
        let forest = forest_of(&[3, 1, 2]);
        // 3 = 0b11: a singleton and an order-1 tree
        assert_eq!(forest.to_string(), "2\n1(3)");
    }

    #[test]
    fn test_check_invariants_detects_heap_order() {
        let mut forest = forest_of(&[1, 2]);
        forest.values.swap(0, 1);
        assert!(matches!(
            forest.check_invariants(),
            Err(InvariantViolation::HeapOrder { .. }) | Err(InvariantViolation::StaleTop { .. })
        ));
    }

    #[test]
    fn test_clear_resets() {
        let mut forest = forest_of(&[1, 2, 3]);
        forest.clear();
        assert_eq!(forest.len(), 0);
        assert_eq!(forest.peek(), None);
        forest.check_invariants().unwrap();
        forest.push(4);
        assert_eq!(forest.peek(), Some(&4));
    }
}
