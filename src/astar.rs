//! Generic best-first search in the style of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html),
//! with a fallible heuristic so that lookup failures surface to the caller instead of being
//! folded into the estimate.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost)
            && self.cost.eq(&other.cost)
            && self.index == other.index
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // First orders per estimated cost, then favors the entry furthest from the start,
        // then the one discovered first. The last step makes the pop order independent of
        // the heap's internal layout.
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => match self.cost.cmp(&other.cost) {
                Ordering::Equal => other.index.cmp(&self.index),
                s => s,
            },
            s => s,
        }
    }
}

/// Outcome of a successful search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<N, C> {
    /// Nodes from start to goal, both inclusive.
    pub path: Vec<N>,
    /// Sum of the move costs along `path`.
    pub cost: C,
    /// Number of nodes taken off the frontier and expanded, goal included.
    pub expanded: usize,
}

fn reverse_path<N, V, F>(parents: &FxIndexMap<N, V>, mut parent: F, start: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
    F: FnMut(&V) -> usize,
{
    let mut i = start;
    let mut path: Vec<N> = std::iter::from_fn(|| {
        parents.get_index(i).map(|(node, value)| {
            i = parent(value);
            node.clone()
        })
    })
    .collect();
    path.reverse();
    path
}

/// Computes a lowest-cost path from `start` to the first node for which `success` holds.
///
/// `successors` yields the neighbours of a node together with the cost of moving there and
/// `heuristic` estimates the remaining cost from a node. The estimate should never exceed the
/// true remaining cost, otherwise the returned path is not guaranteed to be optimal.
///
/// Returns `Ok(None)` when every reachable node has been expanded without reaching a goal and
/// propagates the first heuristic error unchanged. All search state is local to the call.
pub fn astar<N, C, E, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> Result<Option<SearchResult<N, C>>, E>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> Result<C, E>,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        estimated_cost: Zero::zero(),
        cost: Zero::zero(),
        index: 0,
    });
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (usize::MAX, Zero::zero()));
    let mut expanded = 0;
    while let Some(SmallestCostHolder { cost, index, .. }) = to_see.pop() {
        let successors = {
            let (node, &(_, c)) = parents
                .get_index(index)
                .expect("frontier entries always refer to discovered nodes");
            // A node is pushed again whenever a cheaper way to reach it is found. Only the
            // entry carrying the best known cost is expanded, the others are stale.
            if cost > c {
                continue;
            }
            expanded += 1;
            if success(node) {
                let path = reverse_path(&parents, |&(p, _)| p, index);
                debug!(
                    "Goal reached after expanding {} of {} discovered nodes",
                    expanded,
                    parents.len()
                );
                return Ok(Some(SearchResult {
                    path,
                    cost,
                    expanded,
                }));
            }
            successors(node)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let h; // heuristic(&successor)
            let n; // index for successor
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key())?;
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if e.get().1 > new_cost {
                        h = heuristic(e.key())?;
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }

            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost + h,
                cost: new_cost,
                index: n,
            });
        }
    }
    debug!(
        "Frontier exhausted after expanding {} of {} discovered nodes",
        expanded,
        parents.len()
    );
    Ok(None)
}
