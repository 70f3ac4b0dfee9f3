//! Binomial Heap implementation
//!
//! A binomial heap is a collection of binomial trees with:
//! - O(log n) insert and delete_min
//! - O(1) find_min (the least root is cached)
//!
//! This is the plain variant: it supports insert, peek and extract-min only.
//! For decrease-key see [`MutableBinomialHeap`](crate::mutable_binomial::MutableBinomialHeap).
//!
//! # Algorithm Overview
//!
//! A binomial heap maintains a collection of binomial trees, where:
//! - Each tree satisfies the heap property
//! - At most one tree of each degree (0, 1, 2, ..., log n)
//! - This is analogous to binary representation of n
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees
//! - Bₖ has exactly 2ᵏ nodes and height k
//!
//! **Key Operations**:
//! - **Insert**: O(log n) worst - union a single-node tree into the heap (like binary addition)
//! - **Delete-min**: O(log n) worst - remove the cached min root, union its children back in
//!
//! **Storage**: no per-node allocations. Values sit in one dense `Vec`, node links
//! in another, and deleting a value moves the last one into the hole.
//!
//! # Example
//!
//! ```rust
//! use flat_binomial_heap::binomial::BinomialHeap;
//! use flat_binomial_heap::Heap;
//!
//! let mut heap: BinomialHeap<i32> = [5, 3, 8, 1].into_iter().collect();
//! assert_eq!(heap.peek(), Some(&1));
//!
//! heap.pop();
//! assert_eq!(heap.peek(), Some(&3));
//!
//! heap.push(0).unwrap();
//! assert_eq!(heap.peek(), Some(&0));
//! ```

use crate::compare::{Compare, MinComparator};
use crate::forest::{Forest, InvariantViolation};
use crate::traits::{Heap, HeapError};
use std::fmt;

/// Binomial Heap over flat arrays
///
/// Ordered by the comparator `C`, least value on top. The default comparator
/// is [`MinComparator`], giving a min-heap over `T: Ord`.
///
/// Cloning copies the backing arrays; moving the heap is cheap.
#[derive(Debug, Clone)]
pub struct BinomialHeap<T, C = MinComparator> {
    forest: Forest<T, C>,
}

impl<T: Ord> BinomialHeap<T> {
    /// Creates an empty min-heap
    pub fn new() -> Self {
        Self::with_comparator(MinComparator)
    }

    /// Creates an empty min-heap with room for `capacity` values
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, MinComparator)
    }
}

impl<T, C: Compare<T>> BinomialHeap<T, C> {
    /// Creates an empty heap ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        BinomialHeap {
            forest: Forest::new(cmp),
        }
    }

    /// Creates an empty heap ordered by `cmp` with room for `capacity` values
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        BinomialHeap {
            forest: Forest::with_capacity(capacity, cmp),
        }
    }

    /// Builds a heap by inserting every value of `iter` in turn
    ///
    /// There is no linear-time build; each value pays the O(log n) insert cost.
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidComparator`] if any insert does.
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
    /// Only a capacity hint: contents and order are untouched.
    pub fn reserve(&mut self, additional: usize) {
        self.forest.reserve(additional);
    }

    /// Removes every value
    pub fn clear(&mut self) {
        self.forest.clear();
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

    /// Verifies the heap's structural invariants
    ///
    /// Checks that every value is owned by exactly one node, that roots have
    /// distinct degrees in increasing order, that each node's degree matches
    /// its child count, and that no child orders before its parent. O(n).
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.forest.check_invariants()
    }
}

impl<T, C: Compare<T>> Heap<T> for BinomialHeap<T, C> {
    fn len(&self) -> usize {
        self.forest.len()
    }

    /// Inserts a value
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**: This is analogous to binary addition with carry propagation
    /// 1. Create a new single-node tree (degree 0, B₀ tree)
    /// 2. Union it into the root list, linking equal-degree roots
    /// 3. Update the cached minimum if the new value does not exceed it
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidComparator`] if the comparator claims the
    /// value is less than itself. The heap is unchanged.
    fn push(&mut self, value: T) -> Result<(), HeapError> {
        if self.forest.comparator().less(&value, &value) {
            tracing::warn!("comparator reports a value less than itself");
            return Err(HeapError::InvalidComparator);
        }
        self.forest.push(value);
        Ok(())
    }

    fn peek(&self) -> Option<&T> {
        self.forest.peek()
    }

    /// Removes and returns the minimum
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Binomial Tree Property**: When the root of a Bₖ tree is removed, its
    /// children are Bₖ₋₁, Bₖ₋₂, ..., B₀ trees, which are unioned back into the
    /// root list lowest degree first.
    fn pop(&mut self) -> Option<T> {
        self.forest.pop()
    }
}

impl<T, C: Compare<T> + Default> Default for BinomialHeap<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

/// Bulk load without comparator checks; use [`BinomialHeap::from_iter_with`]
/// to have each insert validated.
impl<T, C: Compare<T> + Default> FromIterator<T> for BinomialHeap<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::with_comparator(C::default());
        heap.extend(iter);
        heap
    }
}

impl<T, C: Compare<T>> Extend<T> for BinomialHeap<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.forest.push(value);
        }
    }
}

/// Renders the forest one tree per line, as `root(child child ...)`
impl<T: fmt::Display, C> fmt::Display for BinomialHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.forest, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{FnComparator, MaxComparator};

    #[test]
    fn test_basic_operations() {
        let mut heap = BinomialHeap::new();

        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.push(3).unwrap();
        heap.push(1).unwrap();
        heap.push(2).unwrap();

        assert!(!heap.is_empty());
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek(), Some(&1));

        assert_eq!(heap.pop(), Some(1));
        assert_eq!(heap.pop(), Some(2));
        assert_eq!(heap.pop(), Some(3));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_max_heap() {
        let mut heap = BinomialHeap::with_comparator(MaxComparator);
        for v in [4, 9, 1, 7] {
            heap.push(v).unwrap();
        }
        assert_eq!(heap.into_sorted_vec(), vec![9, 7, 4, 1]);
    }

    #[test]
    fn test_irreflexive_comparator_rejected() {
        let mut heap = BinomialHeap::with_comparator(FnComparator(|a: &i32, b: &i32| a <= b));
        assert_eq!(heap.push(1), Err(HeapError::InvalidComparator));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_from_iter_with() {
        let heap = BinomialHeap::from_iter_with(vec![3, 1, 2], MaxComparator).unwrap();
        assert_eq!(heap.peek(), Some(&3));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_reserve_keeps_contents() {
        let mut heap = BinomialHeap::new();
        heap.push(2).unwrap();
        heap.push(1).unwrap();
        heap.reserve(100);
        assert!(heap.capacity() >= 102);
        assert_eq!(heap.peek(), Some(&1));
        heap.check_invariants().unwrap();
    }

    #[test]
    fn test_clone_is_deep() {
        let mut heap: BinomialHeap<i32> = (0..10).collect();
        let copy = heap.clone();
        heap.pop();
        assert_eq!(heap.len(), 9);
        assert_eq!(copy.len(), 10);
        assert_eq!(copy.peek(), Some(&0));
    }

    #[test]
    fn test_iter_sees_all_values() {
        let heap: BinomialHeap<i32> = [4, 2, 6].into_iter().collect();
        let mut seen: Vec<i32> = heap.iter().copied().collect();
        seen.sort();
        assert_eq!(seen, vec![2, 4, 6]);
    }

    #[test]
    fn test_display() {
        let heap: BinomialHeap<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(heap.to_string(), "2\n1(3)");
    }
}
