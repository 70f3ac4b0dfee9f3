//! Mutable Binomial Heap implementation
//!
//! The same flat binomial forest as [`BinomialHeap`](crate::binomial::BinomialHeap),
//! plus an identity index mapping every stored value to the node that holds
//! it. The index makes values addressable, which enables decrease-key:
//!
//! - O(log n) insert, delete_min and update (decrease-key)
//! - O(1) find_min and membership test
//!
//! # Identity
//!
//! A value is its own identity, so values must be unique within one heap and
//! must not change their `Hash`/`Eq` while stored. To change a value's priority,
//! name the stored value and supply its replacement with
//! [`update`](UpdatableHeap::update); the replacement becomes the new identity.
//!
//! **Decrease-key**: the replacement is written into the old value's node and
//! bubbled up by swapping values with its parent, never by relinking nodes, so
//! the tree shapes stay fixed. Every swap re-points the displaced value in the
//! index.
//!
//! # Example
//!
//! ```rust
//! use flat_binomial_heap::mutable_binomial::MutableBinomialHeap;
//! use flat_binomial_heap::{Heap, UpdatableHeap};
//!
//! let mut heap = MutableBinomialHeap::new();
//! for v in [10, 20, 30] {
//!     heap.push(v).unwrap();
//! }
//! heap.update(&30, 5).unwrap();
//! assert_eq!(heap.peek(), Some(&5));
//! assert_eq!(heap.into_sorted_vec(), vec![5, 10, 20]);
//! ```

use crate::compare::{Compare, MinComparator};
use crate::forest::{Forest, InvariantViolation};
use crate::storage::NodeIdx;
use crate::traits::{Heap, HeapError, UpdatableHeap};
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

/// Binomial heap with an identity index and decrease-key
///
/// Ordered by the comparator `C`, least value on top. Values must be unique
/// under `Eq`; they are hashed with FxHash.
#[derive(Debug, Clone)]
pub struct MutableBinomialHeap<T, C = MinComparator> {
    forest: Forest<T, C>,
    /// Every stored value, mapped to the node holding it
    identity: FxHashMap<T, NodeIdx>,
}

impl<T: Ord + Hash + Clone> MutableBinomialHeap<T> {
    /// Creates an empty min-heap
    pub fn new() -> Self {
        Self::with_comparator(MinComparator)
    }

    /// Creates an empty min-heap with room for `capacity` values
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, MinComparator)
    }
}

impl<T: Hash + Eq + Clone, C: Compare<T>> MutableBinomialHeap<T, C> {
    /// Creates an empty heap ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_capacity_and_comparator(0, cmp)
    }

    /// Creates an empty heap ordered by `cmp` with room for `capacity` values
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        MutableBinomialHeap {
            forest: Forest::with_capacity(capacity, cmp),
            identity: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Builds a heap by inserting every value of `iter` in turn
    ///
    /// # Errors
    /// Fails on the first value that `push` rejects, for example a duplicate.
    pub fn from_iter_with<I: IntoIterator<Item = T>>(iter: I, cmp: C) -> Result<Self, HeapError> {
        let iter = iter.into_iter();
        let mut heap = Self::with_capacity_and_comparator(iter.size_hint().0, cmp);
        for value in iter {
            heap.push(value)?;
        }
        Ok(heap)
    }

    /// Returns the comparator ordering this heap
    pub fn comparator(&self) -> &C {
        self.forest.comparator()
    }

    /// Returns the number of values the heap can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.forest.capacity()
    }

    /// Reserves room for at least `additional` more values
    ///
    /// Only a capacity hint: contents, order and the identity index are untouched.
    pub fn reserve(&mut self, additional: usize) {
        self.forest.reserve(additional);
        self.identity.reserve(additional);
    }

    /// Removes every value
    pub fn clear(&mut self) {
        self.forest.clear();
        self.identity.clear();
    }

    /// Iterates over the values in arbitrary order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.forest.values().iter()
    }

    /// Consumes the heap, returning its values least first
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Some(value) = self.pop() {
            sorted.push(value);
        }
        sorted
    }

    /// Verifies the forest invariants and that the identity index agrees with it
    ///
    /// O(n).
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.forest.check_invariants()?;
        let stale = self.identity.len() != self.forest.len()
            || self
                .identity
                .iter()
                .any(|(value, &node)| self.forest.value(node) != value);
        if stale {
            return Err(InvariantViolation::StaleIdentity {
                tracked: self.identity.len(),
                values: self.forest.len(),
            });
        }
        Ok(())
    }

    #[inline]
    fn check_irreflexive(&self, value: &T) -> Result<(), HeapError> {
        if self.forest.comparator().less(value, value) {
            tracing::warn!("comparator reports a value less than itself");
            return Err(HeapError::InvalidComparator);
        }
        Ok(())
    }
}

impl<T: Hash + Eq + Clone, C: Compare<T>> Heap<T> for MutableBinomialHeap<T, C> {
    fn len(&self) -> usize {
        self.forest.len()
    }

    /// Inserts a value and registers it in the identity index
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// # Errors
    /// - [`HeapError::DuplicateIdentity`] if an equal value is already stored
    /// - [`HeapError::InvalidComparator`] if the comparator claims the value is
    ///   less than itself
    fn push(&mut self, value: T) -> Result<(), HeapError> {
        self.check_irreflexive(&value)?;
        if self.identity.contains_key(&value) {
            return Err(HeapError::DuplicateIdentity);
        }

        let key = value.clone();
        // Linking never moves values, so no other identity changes
        let node = self.forest.push(value);
        self.identity.insert(key, node);
        Ok(())
    }

    fn peek(&self) -> Option<&T> {
        self.forest.peek()
    }

    /// Removes and returns the minimum
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// Compaction moves the last value into the freed slot but keeps it on its
    /// node, so only the removed value leaves the identity index.
    fn pop(&mut self) -> Option<T> {
        let value = self.forest.pop()?;
        self.identity.remove(&value);
        Some(value)
    }
}

impl<T: Hash + Eq + Clone, C: Compare<T>> UpdatableHeap<T> for MutableBinomialHeap<T, C> {
    fn contains(&self, value: &T) -> bool {
        self.identity.contains_key(value)
    }

    /// Replaces `old` with `new` and restores heap order
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**:
    /// 1. Resolve `old` to its node through the identity index
    /// 2. Write `new` into that node's slot
    /// 3. **Bubble up**: while the parent is not strictly less than `new`,
    ///    swap the two values and re-point the displaced value's identity
    /// 4. Register `new` at the node it stopped at and refresh the cached
    ///    minimum if it stopped at a root
    ///
    /// All checks run before step 2, so an error leaves the heap untouched.
    fn update(&mut self, old: &T, new: T) -> Result<(), HeapError> {
        self.check_irreflexive(&new)?;
        let node = *self.identity.get(old).ok_or(HeapError::UnknownIdentity)?;

        let cmp = self.forest.comparator();
        let current = self.forest.value(node);
        if cmp.less(current, &new) {
            if cmp.less(&new, current) {
                tracing::warn!("comparator reports two values each less than the other");
                return Err(HeapError::InvalidComparator);
            }
            return Err(HeapError::NotDecreased);
        }
        if *current != new && self.identity.contains_key(&new) {
            return Err(HeapError::DuplicateIdentity);
        }

        self.identity.remove(old);
        let key = new.clone();
        let identity = &mut self.identity;
        let (rest, _replaced) = self.forest.replace_and_sift_up(node, new, |moved, at| {
            if let Some(slot) = identity.get_mut(moved) {
                *slot = at;
            }
        });
        self.identity.insert(key, rest);
        Ok(())
    }
}

impl<T: Hash + Eq + Clone, C: Compare<T> + Default> Default for MutableBinomialHeap<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

/// Bulk load; see [`Extend`] for how rejected values are handled
impl<T: Hash + Eq + Clone, C: Compare<T> + Default> FromIterator<T> for MutableBinomialHeap<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::with_comparator(C::default());
        heap.extend(iter);
        heap
    }
}

/// Like `HashSet`, values already present are skipped. Values the comparator
/// rejects are skipped too; use [`MutableBinomialHeap::from_iter_with`] to see
/// the error instead.
impl<T: Hash + Eq + Clone, C: Compare<T>> Extend<T> for MutableBinomialHeap<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        let mut skipped = 0usize;
        for value in iter {
            if self.push(value).is_err() {
                skipped += 1;
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "extend skipped rejected values");
        }
    }
}

/// Renders the forest one tree per line, as `root(child child ...)`
impl<T: fmt::Display, C> fmt::Display for MutableBinomialHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.forest, f)
    }
}
