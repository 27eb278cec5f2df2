use crate::distance::PositionLookup;
use crate::heuristic::{BoundHeuristic, Heuristic};
use crate::solver::GraphSolver;

/// Uniform-cost search, i.e. A* with the zero heuristic. Needs no positions.
#[derive(Clone, Debug)]
pub struct DijkstraSolver;

impl GraphSolver for DijkstraSolver {
    fn heuristic<'a>(&'a self, positions: &'a PositionLookup) -> BoundHeuristic<'a> {
        Heuristic::Zero.bind(positions)
    }
}
