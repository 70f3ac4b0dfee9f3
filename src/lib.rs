//! Flat binomial heaps for Rust
//!
//! This crate provides a binomial heap whose forest lives in plain arrays
//! instead of per-node allocations, in two flavors:
//!
//! - **[`BinomialHeap`](binomial::BinomialHeap)**: O(log n) insert and delete-min; O(1) find-min
//! - **[`MutableBinomialHeap`](mutable_binomial::MutableBinomialHeap)**: the same, plus an identity
//!   index giving O(1) membership tests and O(log n) decrease-key by value
//!
//! Both are ordered by a [`Compare`] implementation, least value on top.
//! [`MinComparator`] (the default) and [`MaxComparator`] cover `Ord` types;
//! [`FnComparator`] and [`KeyComparator`] adapt closures.
//!
//! # Features
//!
//! - `check-invariants`: re-verify the whole forest after every mutation and
//!   panic on the first violation. O(n) per operation; meant for tests.
//!
//! # Example
//!
//! ```rust
//! use flat_binomial_heap::mutable_binomial::MutableBinomialHeap;
//! use flat_binomial_heap::{Heap, UpdatableHeap};
//!
//! let mut heap = MutableBinomialHeap::new();
//! heap.push(5).unwrap();
//! heap.push(3).unwrap();
//! heap.update(&5, 1).unwrap();
//! assert_eq!(heap.peek(), Some(&1));
//! ```

pub mod binomial;
pub mod compare;
mod forest;
pub mod mutable_binomial;
pub mod pathfinding;
mod storage;
pub mod traits;

pub use compare::{Compare, FnComparator, KeyComparator, MaxComparator, MinComparator};
pub use forest::InvariantViolation;
pub use traits::{Heap, HeapError, UpdatableHeap};
