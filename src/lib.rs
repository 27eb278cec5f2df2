//! # graph_pathfinding
//!
//! Shortest paths on 2D road networks. Implements
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) over a weighted, optionally directed
//! graph with a pluggable heuristic (zero, Euclidean, Manhattan or a custom function).
//! Pre-computes [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! to avoid flooding the graph if no path exists.
//!
//! Road networks are read from [GraphML](http://graphml.graphdrawing.org/) files and found
//! routes can be rendered as a sequence of SVG frames that progressively color the traversed
//! road segments.
mod astar;
pub mod config;
pub mod distance;
pub mod error;
pub mod graphml;
pub mod heuristic;
pub mod render;
pub mod road_graph;
pub mod solver;

pub use astar::{astar, SearchResult};
pub use distance::{euclidean_distance, manhattan_distance, Position, PositionLookup};
pub use error::PathError;
pub use graphml::{load_graph, parse_graphml};
pub use heuristic::{bind_distance, Heuristic, HeuristicKind};
pub use road_graph::{RoadEdge, RoadGraph, RoadNetwork};
pub use solver::{astar::AstarSolver, dijkstra::DijkstraSolver, GraphSolver, Route};

use config::SearchSettings;
use itertools::Itertools;
use log::info;
use ordered_float::OrderedFloat;

/// Cost type used by the search. [OrderedFloat] gives edge weights the total order the
/// frontier needs.
pub type Cost = OrderedFloat<f64>;

/// Turns a path into the ordered sequence of traversed edges `(path[i], path[i + 1])`. A path
/// consisting of a single node yields no edges.
pub fn path_to_edges<N: Clone>(path: &[N]) -> Vec<(N, N)> {
    path.iter().cloned().tuple_windows().collect()
}

/// Builds the solver described by `settings`.
pub fn solver_from_settings(settings: &SearchSettings) -> AstarSolver {
    AstarSolver::new(settings.heuristic.into()).with_heuristic_factor(settings.heuristic_factor)
}

/// Computes a route from start to goal with the solver described by `settings`.
pub fn run_search(
    network: &RoadNetwork,
    settings: &SearchSettings,
    start: &str,
    goal: &str,
) -> error::Result<Route> {
    let solver = solver_from_settings(settings);
    info!(
        "Searching {} -> {} with the {} heuristic",
        start, goal, settings.heuristic
    );
    let route = solver.get_route_single_goal(network, start, goal)?;
    info!(
        "Found a path of {} nodes with cost {} after expanding {} nodes",
        route.path.len(),
        route.cost,
        route.expanded
    );
    Ok(route)
}

/// A-B (1), B-C (1), A-C (5) plus an isolated node D, laid out so that both the Euclidean and
/// the Manhattan heuristic are admissible.
#[cfg(test)]
pub(crate) fn test_network() -> RoadNetwork {
    let mut graph = RoadGraph::new(false);
    for id in ["A", "B", "C", "D"] {
        graph.add_node(id);
    }
    graph.generate_components();
    graph.add_edge("A", "B", RoadEdge::new(1.0)).unwrap();
    graph.add_edge("B", "C", RoadEdge::new(1.0)).unwrap();
    graph.add_edge("A", "C", RoadEdge::dotted(5.0)).unwrap();
    let positions = [
        ("A", Position::new(0.0, 0.0)),
        ("B", Position::new(1.0, 0.0)),
        ("C", Position::new(1.0, 1.0)),
        ("D", Position::new(5.0, 5.0)),
    ]
    .into_iter()
    .collect();
    RoadNetwork::new(graph, positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_path() {
        let path = ["A", "B", "C", "D"];
        assert_eq!(
            path_to_edges(&path),
            vec![("A", "B"), ("B", "C"), ("C", "D")]
        );
    }

    #[test]
    fn short_paths_have_no_edges() {
        assert!(path_to_edges(&["A"]).is_empty());
        assert!(path_to_edges::<&str>(&[]).is_empty());
    }

    #[test]
    fn route_edges_are_graph_edges() {
        let network = test_network();
        let route = run_search(&network, &SearchSettings::default(), "A", "C").unwrap();
        let edges = route.edges();
        assert_eq!(edges.len(), route.path.len() - 1);
        assert!(edges.iter().all(|(u, v)| network.graph.has_edge(u, v)));
    }

    #[test]
    fn zero_and_informed_costs_agree() {
        let network = test_network();
        let informed = run_search(&network, &SearchSettings::default(), "C", "A").unwrap();
        let uniform = DijkstraSolver
            .get_route_single_goal(&network, "C", "A")
            .unwrap();
        assert_eq!(informed.cost, uniform.cost);
        assert!(informed.expanded <= uniform.expanded);
    }
}
