use crate::astar::astar;
use crate::distance::PositionLookup;
use crate::error::{PathError, Result};
use crate::heuristic::BoundHeuristic;
use crate::road_graph::{RoadGraph, RoadNetwork};
use crate::{path_to_edges, Cost};
use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;

pub mod astar;
pub mod dijkstra;

/// A path found by a solver.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Node ids from start to goal, both inclusive.
    pub path: Vec<String>,
    /// Total weight of the edges along `path`.
    pub cost: f64,
    /// Number of nodes the search expanded.
    pub expanded: usize,
}

impl Route {
    /// The traversed edges in order, see [path_to_edges].
    pub fn edges(&self) -> Vec<(String, String)> {
        path_to_edges(&self.path)
    }
}

pub trait GraphSolver {
    /// Binds the solver's estimate to the positions of a network. The returned function is
    /// called as `h(node, goal)`.
    fn heuristic<'a>(&'a self, positions: &'a PositionLookup) -> BoundHeuristic<'a>;

    fn successors(&self, graph: &RoadGraph, node: NodeIndex) -> Vec<(NodeIndex, Cost)> {
        graph.neighborhood_and_cost(node)
    }

    /// Sums the weights of the edges along `path`. Fails with [PathError::MissingEdge] if two
    /// consecutive nodes are not connected.
    fn get_path_cost(&self, graph: &RoadGraph, path: &[String]) -> Result<f64> {
        path_to_edges(path)
            .into_iter()
            .map(|(from, to)| match graph.find_edge(&from, &to) {
                Some(edge) => Ok(edge.weight),
                None => Err(PathError::MissingEdge { from, to }),
            })
            .sum()
    }

    /// Computes a lowest-cost path from start to goal. The node ids are validated before any
    /// search work is done.
    fn get_path_single_goal(
        &self,
        network: &RoadNetwork,
        start: &str,
        goal: &str,
    ) -> Result<Vec<String>> {
        self.get_route_single_goal(network, start, goal)
            .map(|route| route.path)
    }

    /// Like [get_path_single_goal](Self::get_path_single_goal) but also reports the cost of
    /// the path and the number of expanded nodes.
    fn get_route_single_goal(
        &self,
        network: &RoadNetwork,
        start: &str,
        goal: &str,
    ) -> Result<Route> {
        let graph = &network.graph;
        let start_ix = graph.node_index(start)?;
        let goal_ix = graph.node_index(goal)?;
        let no_path = || PathError::NoPathFound {
            start: start.to_owned(),
            goal: goal.to_owned(),
        };
        // Check if start and goal are on the same connected component.
        if graph.unreachable(start_ix, goal_ix) {
            info!("{} is not reachable from {}", goal, start);
            return Err(no_path());
        }
        debug!("Searching for a path from {} to {}", start, goal);
        let h = self.heuristic(&network.positions);
        let result = astar(
            &start_ix,
            |node| self.successors(graph, *node),
            |node| h(graph.node_id(*node), goal).map(OrderedFloat),
            |node| *node == goal_ix,
        )?;
        match result {
            Some(found) => Ok(Route {
                path: found
                    .path
                    .into_iter()
                    .map(|ix| graph.node_id(ix).to_owned())
                    .collect(),
                cost: found.cost.into_inner(),
                expanded: found.expanded,
            }),
            None => {
                warn!("Frontier exhausted without reaching {} from {}", goal, start);
                Err(no_path())
            }
        }
    }

    /// Computes a path from the start to the cheapest of the given goals and returns the
    /// selected goal in addition to the route. The heuristic value of a node is its smallest
    /// estimate over all goals.
    fn get_route_multiple_goals(
        &self,
        network: &RoadNetwork,
        start: &str,
        goals: &[&str],
    ) -> Result<(String, Route)> {
        let graph = &network.graph;
        let start_ix = graph.node_index(start)?;
        let goal_ixs = goals
            .iter()
            .map(|goal| graph.node_index(goal))
            .collect::<Result<Vec<_>>>()?;
        let no_path = || PathError::NoPathFound {
            start: start.to_owned(),
            goal: goals.join(", "),
        };
        if goal_ixs.iter().all(|&g| graph.unreachable(start_ix, g)) {
            info!("None of [{}] is reachable from {}", goals.join(", "), start);
            return Err(no_path());
        }
        let h = self.heuristic(&network.positions);
        let result = astar(
            &start_ix,
            |node| self.successors(graph, *node),
            |node| -> Result<Cost> {
                let id = graph.node_id(*node);
                let mut best = f64::INFINITY;
                for &goal in goals {
                    best = best.min(h(id, goal)?);
                }
                Ok(OrderedFloat(best))
            },
            |node| goal_ixs.contains(node),
        )?;
        let found = result.ok_or_else(no_path)?;
        let path: Vec<String> = found
            .path
            .into_iter()
            .map(|ix| graph.node_id(ix).to_owned())
            .collect();
        let selected = path.last().cloned().ok_or_else(no_path)?;
        Ok((
            selected,
            Route {
                path,
                cost: found.cost.into_inner(),
                expanded: found.expanded,
            },
        ))
    }
}
