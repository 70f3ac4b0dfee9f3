//! Common traits for the binomial heaps
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`Heap`]: insert, peek and extract-min, implemented by both heaps
//! - [`UpdatableHeap`]: adds identity lookup and in-place key decrease
//!
//! Unlike the handle-based priority queues common in the literature, values are
//! their own identity: an updatable heap locates an element by the value it
//! currently holds, so values must be unique within one heap.

use thiserror::Error;

/// Error type for heap operations
///
/// Every operation that returns an error checks its preconditions before it
/// touches the heap, so a failed call leaves the heap exactly as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapError {
    /// The heap holds no values
    #[error("heap is empty")]
    EmptyHeap,
    /// The value to update is not tracked by the identity index
    #[error("value is not tracked by the heap's identity index")]
    UnknownIdentity,
    /// The comparator was caught violating the strict weak order contract
    #[error("comparator is not a strict weak order")]
    InvalidComparator,
    /// The new value orders after the value it replaces
    #[error("new value orders after the value it replaces")]
    NotDecreased,
    /// The value is already tracked by another element of the heap
    #[error("value is already tracked by another element")]
    DuplicateIdentity,
}

/// Base trait for the heaps in this crate
///
/// The API follows `std::collections::BinaryHeap`, except that the heap is
/// ordered by its comparator with the least value on top, and `push` reports
/// the problems it can detect instead of silently corrupting the heap.
///
/// # Example
///
/// ```rust
/// use flat_binomial_heap::binomial::BinomialHeap;
/// use flat_binomial_heap::{Heap, HeapError};
///
/// let mut heap = BinomialHeap::new();
/// assert_eq!(heap.peek_min(), Err(HeapError::EmptyHeap));
///
/// heap.push(3).unwrap();
/// heap.push(1).unwrap();
/// heap.push(2).unwrap();
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.pop(), Some(1));
/// assert_eq!(heap.len(), 2);
/// ```
pub trait Heap<T> {
    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of values in the heap
    fn len(&self) -> usize;

    /// Inserts a value
    ///
    /// # Time Complexity
    /// O(log n) worst case.
    fn push(&mut self, value: T) -> Result<(), HeapError>;

    /// Returns the least value without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<&T>;

    /// Returns the least value, or [`HeapError::EmptyHeap`]
    fn peek_min(&self) -> Result<&T, HeapError> {
        self.peek().ok_or(HeapError::EmptyHeap)
    }

    /// Removes and returns the least value; does nothing on an empty heap
    ///
    /// # Time Complexity
    /// O(log n) worst case.
    fn pop(&mut self) -> Option<T>;
}

/// Heap with identity lookup and decrease-key
///
/// # Example
///
/// ```rust
/// use flat_binomial_heap::mutable_binomial::MutableBinomialHeap;
/// use flat_binomial_heap::{Heap, UpdatableHeap};
///
/// let mut heap = MutableBinomialHeap::new();
/// heap.push(10).unwrap();
/// heap.push(20).unwrap();
/// heap.update(&20, 5).unwrap();
/// assert!(heap.contains(&5));
/// assert!(!heap.contains(&20));
/// assert_eq!(heap.peek(), Some(&5));
/// ```
pub trait UpdatableHeap<T>: Heap<T> {
    /// Returns true if a value equal to `value` is held by the heap
    fn contains(&self, value: &T) -> bool;

    /// Replaces the element currently identified by `old` with `new`
    ///
    /// `new` must not order after `old`; the element then moves toward the root
    /// to restore heap order.
    ///
    /// # Errors
    /// - [`HeapError::UnknownIdentity`] if `old` is not in the heap
    /// - [`HeapError::NotDecreased`] if `new` orders after `old`
    /// - [`HeapError::DuplicateIdentity`] if `new` already identifies another element
    /// - [`HeapError::InvalidComparator`] if the comparator is caught misbehaving
    ///
    /// # Time Complexity
    /// O(log n) worst case.
    fn update(&mut self, old: &T, new: T) -> Result<(), HeapError>;
}
