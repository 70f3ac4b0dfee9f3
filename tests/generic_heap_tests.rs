//! Generic tests for every Heap implementation
//!
//! These tests only use the trait interface, so each one runs against both
//! heap flavors.

use flat_binomial_heap::binomial::BinomialHeap;
use flat_binomial_heap::mutable_binomial::MutableBinomialHeap;
use flat_binomial_heap::{Heap, HeapError, MaxComparator};

// Test helpers that work with any Heap implementation

/// Test that empty heap behaves correctly
fn test_empty_heap<H: Heap<i32> + Default>() {
    let mut heap = H::default();
    assert!(heap.is_empty());
    assert_eq!(heap.len(), 0);
    assert_eq!(heap.peek(), None);
    assert_eq!(heap.pop(), None);
    assert_eq!(heap.peek_min(), Err(HeapError::EmptyHeap));
}

/// Test basic push and pop operations
fn test_basic_operations<H: Heap<i32> + Default>() {
    let mut heap = H::default();

    for v in [5, 1, 10, 3] {
        heap.push(v).unwrap();
    }
    assert!(!heap.is_empty());
    assert_eq!(heap.len(), 4);
    assert_eq!(heap.peek(), Some(&1));

    assert_eq!(heap.pop(), Some(1));
    assert_eq!(heap.pop(), Some(3));
    assert_eq!(heap.pop(), Some(5));
    assert_eq!(heap.pop(), Some(10));
    assert_eq!(heap.pop(), None);
    assert!(heap.is_empty());
}

/// Peeking never changes the heap
fn test_peek_idempotent<H: Heap<i32> + Default>() {
    let mut heap = H::default();
    heap.push(8).unwrap();
    heap.push(2).unwrap();
    for _ in 0..5 {
        assert_eq!(heap.peek(), Some(&2));
        assert_eq!(heap.peek_min(), Ok(&2));
    }
    assert_eq!(heap.len(), 2);
}

fn test_ascending_insertion<H: Heap<i32> + Default>() {
    let mut heap = H::default();
    for v in 0..200 {
        heap.push(v).unwrap();
        assert_eq!(heap.peek(), Some(&0));
    }
    for v in 0..200 {
        assert_eq!(heap.pop(), Some(v));
    }
}

fn test_descending_insertion<H: Heap<i32> + Default>() {
    let mut heap = H::default();
    for v in (0..200).rev() {
        heap.push(v).unwrap();
        assert_eq!(heap.peek(), Some(&v));
    }
    for v in 0..200 {
        assert_eq!(heap.pop(), Some(v));
    }
}

/// Interleaved pushes and pops keep the minimum correct
fn test_alternating_operations<H: Heap<i32> + Default>() {
    let mut heap = H::default();
    let mut model = Vec::new();
    for round in 0..100i32 {
        let v = (round * 37) % 101;
        heap.push(v).unwrap();
        model.push(v);
        if round % 3 == 2 {
            model.sort_unstable();
            assert_eq!(heap.pop(), Some(model.remove(0)));
        }
        assert_eq!(heap.len(), model.len());
    }
    model.sort_unstable();
    for v in model {
        assert_eq!(heap.pop(), Some(v));
    }
}

/// Pushing a new minimum onto a drained heap works
fn test_drain_and_refill<H: Heap<i32> + Default>() {
    let mut heap = H::default();
    for v in [3, 1, 2] {
        heap.push(v).unwrap();
    }
    while heap.pop().is_some() {}
    assert!(heap.is_empty());
    heap.push(-5).unwrap();
    assert_eq!(heap.peek(), Some(&-5));
    assert_eq!(heap.len(), 1);
}

fn test_negative_values<H: Heap<i32> + Default>() {
    let mut heap = H::default();
    for v in [-10, 0, -100, 50, -1] {
        heap.push(v).unwrap();
    }
    assert_eq!(heap.pop(), Some(-100));
    assert_eq!(heap.pop(), Some(-10));
    assert_eq!(heap.pop(), Some(-1));
}

fn test_extreme_values<H: Heap<i32> + Default>() {
    let mut heap = H::default();
    heap.push(i32::MAX).unwrap();
    heap.push(i32::MIN).unwrap();
    heap.push(0).unwrap();
    assert_eq!(heap.pop(), Some(i32::MIN));
    assert_eq!(heap.pop(), Some(0));
    assert_eq!(heap.pop(), Some(i32::MAX));
}

/// A larger pseudo-random workload
fn test_stress_operations<H: Heap<i32> + Default>() {
    let mut heap = H::default();
    let mut state = 12345u32;
    let mut expected = Vec::new();
    for _ in 0..2000 {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        let v = (state >> 8) as i32;
        if heap.push(v).is_ok() {
            expected.push(v);
        }
    }
    expected.sort_unstable();
    expected.dedup();
    let mut last = i32::MIN;
    let mut popped = 0;
    while let Some(v) = heap.pop() {
        assert!(v >= last);
        last = v;
        popped += 1;
    }
    assert!(popped >= expected.len());
}

/// Max ordering through the same trait interface
fn test_max_ordering<H: Heap<i32>>(mut heap: H) {
    for v in [4, 9, 1] {
        heap.push(v).unwrap();
    }
    assert_eq!(heap.pop(), Some(9));
    assert_eq!(heap.pop(), Some(4));
    assert_eq!(heap.pop(), Some(1));
}

// Macro to generate a single test function
macro_rules! heap_test {
    ($name:ident, $heap:ty, $func:ident) => {
        #[test]
        fn $name() {
            $func::<$heap>();
        }
    };
}

// Generates the shared suite for one heap type inside its own module
macro_rules! define_heap_tests {
    ($module:ident, $heap_type:ty) => {
        mod $module {
            use super::*;

            heap_test!(test_empty, $heap_type, test_empty_heap);
            heap_test!(test_basic, $heap_type, test_basic_operations);
            heap_test!(test_peek, $heap_type, test_peek_idempotent);
            heap_test!(test_ascending, $heap_type, test_ascending_insertion);
            heap_test!(test_descending, $heap_type, test_descending_insertion);
            heap_test!(test_alternating, $heap_type, test_alternating_operations);
            heap_test!(test_refill, $heap_type, test_drain_and_refill);
            heap_test!(test_negative, $heap_type, test_negative_values);
            heap_test!(test_extremes, $heap_type, test_extreme_values);
            heap_test!(test_stress, $heap_type, test_stress_operations);
        }
    };
}

define_heap_tests!(binomial, BinomialHeap<i32>);
define_heap_tests!(mutable_binomial, MutableBinomialHeap<i32>);

#[test]
fn test_binomial_max_ordering() {
    test_max_ordering(BinomialHeap::with_comparator(MaxComparator));
}

#[test]
fn test_mutable_binomial_max_ordering() {
    test_max_ordering(MutableBinomialHeap::with_comparator(MaxComparator));
}
