use crate::distance::PositionLookup;
use crate::error::PathError;
use crate::heuristic::{BoundHeuristic, Heuristic};
use crate::solver::GraphSolver;

/// A* with a configurable [Heuristic]. A `heuristic_factor` above 1.0 turns this into
/// weighted A*, which expands fewer nodes but may return a more expensive path.
#[derive(Clone, Debug)]
pub struct AstarSolver {
    pub heuristic: Heuristic,
    pub heuristic_factor: f64,
}

impl Default for AstarSolver {
    fn default() -> AstarSolver {
        AstarSolver::new(Heuristic::default())
    }
}

impl AstarSolver {
    pub fn new(heuristic: Heuristic) -> AstarSolver {
        AstarSolver {
            heuristic,
            heuristic_factor: 1.0,
        }
    }
    pub fn with_heuristic_factor(mut self, heuristic_factor: f64) -> AstarSolver {
        self.heuristic_factor = heuristic_factor;
        self
    }
}

impl GraphSolver for AstarSolver {
    /// The bound heuristic times the heuristic factor. Scaled estimates that are negative or
    /// NaN fail with [PathError::InvalidHeuristic].
    fn heuristic<'a>(&'a self, positions: &'a PositionLookup) -> BoundHeuristic<'a> {
        let h = self.heuristic.bind(positions);
        if self.heuristic_factor == 1.0 {
            return h;
        }
        let factor = self.heuristic_factor;
        Box::new(move |u, v| {
            let value = h(u, v)? * factor;
            if value >= 0.0 {
                Ok(value)
            } else {
                Err(PathError::InvalidHeuristic {
                    node: u.to_owned(),
                    value,
                })
            }
        })
    }
}
