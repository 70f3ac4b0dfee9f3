//! Dijkstra's shortest path search on top of the mutable binomial heap
//!
//! The search keeps its open set in a
//! [`MutableBinomialHeap`](crate::mutable_binomial::MutableBinomialHeap) and
//! lowers a node's tentative cost in place with `update` when a cheaper path is
//! found, instead of pushing duplicates and skipping stale entries.
//!
//! # Design
//!
//! Only lightweight `(cost, index)` pairs are stored in the heap. Each pair is
//! unique because a node index is in the open set at most once, so the pair
//! doubles as the heap's identity key. A fast hash map (FxHash) maps node
//! states to their index.
//!
//! # Example
//!
//! ```rust
//! use flat_binomial_heap::pathfinding::{dijkstra, SearchNode};
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! struct GridPos { x: i32, y: i32, goal_x: i32, goal_y: i32 }
//!
//! impl SearchNode for GridPos {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, Self::Cost)> {
//!         let step = |dx: i32, dy: i32| GridPos { x: self.x + dx, y: self.y + dy, ..self.clone() };
//!         vec![(step(1, 0), 1), (step(-1, 0), 1), (step(0, 1), 1), (step(0, -1), 1)]
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.x == self.goal_x && self.y == self.goal_y
//!     }
//! }
//!
//! let start = GridPos { x: 0, y: 0, goal_x: 2, goal_y: 2 };
//! let (path, cost) = dijkstra(&start).unwrap().unwrap();
//! assert_eq!(cost, 4); // Manhattan distance
//! assert_eq!(path.len(), 5);
//! ```

use crate::compare::Compare;
use crate::mutable_binomial::MutableBinomialHeap;
use crate::traits::{Heap, HeapError, UpdatableHeap};
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::ops::Add;

/// Trait for types that can be used as edge and path costs.
///
/// Costs must be totally ordered, cheap to copy, addable, hashable (they are
/// part of the heap's identity key), and `Default` must be zero.
///
/// # Overflow
/// Path costs are summed with plain `+`. A path whose total exceeds the cost
/// type's range panics in debug builds and wraps in release builds, which
/// corrupts the search order. Pick a cost type wide enough for the longest
/// path, or wrap costs in a type whose `Add` saturates.
pub trait Cost: Ord + Copy + Hash + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Hash + Add<Output = Self> + Default {}

/// Trait for nodes in a search graph.
///
/// The node carries all context needed to generate successors and to decide
/// whether it is a goal.
pub trait SearchNode: Clone + Eq + Hash {
    /// The cost type for edge weights
    type Cost: Cost;

    /// Returns all successor nodes along with the cost to reach them.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// Internal index type; lightweight indices are stored in the heap instead of
/// full node data.
type NodeIndex = usize;

/// Open-set entry: tentative cost of reaching a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Frontier<C> {
    cost: C,
    index: NodeIndex,
}

/// Orders frontier entries by cost alone
#[derive(Debug, Clone, Copy, Default)]
struct ByCost;

impl<C: Ord> Compare<Frontier<C>> for ByCost {
    #[inline]
    fn less(&self, a: &Frontier<C>, b: &Frontier<C>) -> bool {
        a.cost < b.cost
    }
}

/// Metadata stored for each discovered node.
struct NodeEntry<N: SearchNode> {
    node: N,
    /// Best known cost from the start
    g_score: N::Cost,
    /// Previous node on the best known path
    came_from: Option<NodeIndex>,
    /// Whether the node's cost is final
    closed: bool,
}

/// Incremental Dijkstra state: settles one node per call to `settle_next`.
struct Search<N: SearchNode> {
    open: MutableBinomialHeap<Frontier<N::Cost>, ByCost>,
    nodes: Vec<NodeEntry<N>>,
    state_to_index: FxHashMap<N, NodeIndex>,
    /// Successors costlier than this are not explored
    budget: Option<N::Cost>,
    /// Settle goal nodes without relaxing their successors
    stop_at_goal: bool,
}

impl<N: SearchNode> Search<N> {
    fn new(start: &N, budget: Option<N::Cost>, stop_at_goal: bool) -> Result<Self, HeapError> {
        let mut search = Search {
            open: MutableBinomialHeap::with_comparator(ByCost),
            nodes: Vec::new(),
            state_to_index: FxHashMap::default(),
            budget,
            stop_at_goal,
        };
        let (index, _) = search.get_or_create_index(start.clone(), N::Cost::default());
        search.open.push(Frontier {
            cost: N::Cost::default(),
            index,
        })?;
        Ok(search)
    }

    /// Gets or creates an index for a node state.
    fn get_or_create_index(&mut self, node: N, g_score: N::Cost) -> (NodeIndex, bool) {
        if let Some(&index) = self.state_to_index.get(&node) {
            return (index, false);
        }
        let index = self.nodes.len();
        self.state_to_index.insert(node.clone(), index);
        self.nodes.push(NodeEntry {
            node,
            g_score,
            came_from: None,
            closed: false,
        });
        (index, true)
    }

    /// Pops the cheapest open node, relaxes its successors, and returns it.
    fn settle_next(&mut self) -> Result<Option<(NodeIndex, N::Cost)>, HeapError> {
        let Some(Frontier { cost, index }) = self.open.pop() else {
            return Ok(None);
        };
        self.nodes[index].closed = true;
        let current = self.nodes[index].node.clone();
        if self.stop_at_goal && current.is_goal() {
            return Ok(Some((index, cost)));
        }

        for (neighbor, edge_cost) in current.successors() {
            let tentative = cost + edge_cost;
            if self.budget.is_some_and(|budget| tentative > budget) {
                continue;
            }

            let (neighbor_index, is_new) = self.get_or_create_index(neighbor, tentative);
            let entry = &mut self.nodes[neighbor_index];
            if entry.closed {
                continue;
            }

            if is_new {
                entry.came_from = Some(index);
                self.open.push(Frontier {
                    cost: tentative,
                    index: neighbor_index,
                })?;
            } else if tentative < entry.g_score {
                let stale = Frontier {
                    cost: entry.g_score,
                    index: neighbor_index,
                };
                entry.g_score = tentative;
                entry.came_from = Some(index);
                self.open.update(
                    &stale,
                    Frontier {
                        cost: tentative,
                        index: neighbor_index,
                    },
                )?;
            }
        }

        Ok(Some((index, cost)))
    }

    /// Reconstructs the path from start to the given node index.
    fn reconstruct_path(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = vec![self.nodes[current].node.clone()];
        while let Some(prev) = self.nodes[current].came_from {
            path.push(self.nodes[prev].node.clone());
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Runs Dijkstra's algorithm from the start node until `is_goal()` returns true.
///
/// # Returns
/// - `Ok(Some((path, cost)))` if a path is found; the path includes both ends
/// - `Ok(None)` if no goal is reachable
///
/// # Errors
/// Propagates a [`HeapError`] from the open set. With a well-behaved `Ord` on
/// the cost type this does not happen.
pub fn dijkstra<N: SearchNode>(start: &N) -> Result<Option<(Vec<N>, N::Cost)>, HeapError> {
    let mut search = Search::new(start, None, true)?;
    while let Some((index, cost)) = search.settle_next()? {
        if search.nodes[index].node.is_goal() {
            tracing::debug!(settled = search.nodes.len(), "goal reached");
            return Ok(Some((search.reconstruct_path(index), cost)));
        }
    }
    Ok(None)
}

/// Finds every node reachable from `start` with total cost at most `budget`.
///
/// `is_goal` is ignored. Results are in non-decreasing cost order, starting
/// with `start` at cost zero.
///
/// # Errors
/// Propagates a [`HeapError`] from the open set.
pub fn reachable_within<N: SearchNode>(
    start: &N,
    budget: N::Cost,
) -> Result<Vec<(N, N::Cost)>, HeapError> {
    let mut search = Search::new(start, Some(budget), false)?;
    let mut reached = Vec::new();
    while let Some((index, cost)) = search.settle_next()? {
        reached.push((search.nodes[index].node.clone(), cost));
    }
    Ok(reached)
}
