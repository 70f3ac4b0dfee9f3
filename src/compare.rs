//! Comparators that order heap values
//!
//! A heap is ordered by a [`Compare`] implementation that answers a single
//! question, "is `a` strictly less than `b`?", and must describe a strict weak
//! order. The heap keeps the least value on top, so [`MinComparator`] gives a
//! min-heap and [`MaxComparator`] a max-heap.
//!
//! # Example
//!
//! ```rust
//! use flat_binomial_heap::binomial::BinomialHeap;
//! use flat_binomial_heap::compare::{FnComparator, KeyComparator};
//! use flat_binomial_heap::Heap;
//!
//! // Longest string first
//! let mut heap = BinomialHeap::with_comparator(FnComparator(|a: &&str, b: &&str| a.len() > b.len()));
//! heap.push("ab").unwrap();
//! heap.push("abcd").unwrap();
//! assert_eq!(heap.peek(), Some(&"abcd"));
//!
//! // Order pairs by their second field only
//! let mut heap = BinomialHeap::with_comparator(KeyComparator(|p: &(char, u32)| p.1));
//! heap.push(('a', 9)).unwrap();
//! heap.push(('b', 2)).unwrap();
//! assert_eq!(heap.peek(), Some(&('b', 2)));
//! ```

use std::fmt;

/// A strict weak order over `T`
///
/// Implementations must be irreflexive (`less(a, a)` is false), asymmetric and
/// transitive. The heaps detect some violations opportunistically and report
/// [`HeapError::InvalidComparator`](crate::HeapError::InvalidComparator), but
/// they cannot detect all of them.
pub trait Compare<T: ?Sized> {
    /// Returns true if `a` orders strictly before `b`
    fn less(&self, a: &T, b: &T) -> bool;
}

/// Orders by `Ord`, least first (min-heap)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinComparator;

impl<T: Ord + ?Sized> Compare<T> for MinComparator {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Orders by `Ord`, greatest first (max-heap)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxComparator;

impl<T: Ord + ?Sized> Compare<T> for MaxComparator {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

/// Wraps a `less`-style closure
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<T: ?Sized, F: Fn(&T, &T) -> bool> Compare<T> for FnComparator<F> {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnComparator").finish_non_exhaustive()
    }
}

/// Orders values by an extracted `Ord` key, least key first
///
/// Values with equal keys are equivalent under this order even when the values
/// themselves differ, which makes this the usual choice for (priority, payload)
/// pairs.
#[derive(Clone, Copy)]
pub struct KeyComparator<F>(pub F);

impl<T: ?Sized, K: Ord, F: Fn(&T) -> K> Compare<T> for KeyComparator<F> {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        (self.0)(a) < (self.0)(b)
    }
}

impl<F> fmt::Debug for KeyComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyComparator").finish_non_exhaustive()
    }
}
