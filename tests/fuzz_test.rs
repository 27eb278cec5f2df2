/// Fuzzes the search by checking many random geometric graphs against petgraph's Dijkstra: a
/// path is found exactly when the goal is reachable, its cost is optimal for both the zero and
/// the Euclidean heuristic, and the informed search never expands more nodes.
use graph_pathfinding::{
    path_to_edges, AstarSolver, DijkstraSolver, GraphSolver, Heuristic, PathError, Position,
    PositionLookup, RoadEdge, RoadGraph, RoadNetwork,
};
use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use rand::prelude::*;

const EPS: f64 = 1e-9;

/// Random nodes in a 100x100 square, connected with probability `density`. Every edge costs at
/// least its straight-line length so the Euclidean heuristic stays admissible. Returns the
/// network together with an undirected petgraph copy used as reference.
fn random_network(n: usize, density: f64, rng: &mut StdRng) -> (RoadNetwork, UnGraph<(), f64>) {
    let mut graph = RoadGraph::new(false);
    let mut reference = UnGraph::<(), f64>::new_undirected();
    let mut positions = PositionLookup::new();
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let p = Position::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0));
        graph.add_node(i.to_string());
        reference.add_node(());
        positions.insert(i.to_string(), p);
        points.push(p);
    }
    graph.generate_components();
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen_bool(density) {
                let weight = points[i].euclidean_distance(&points[j]) * rng.gen_range(1.01..2.0);
                let edge = if rng.gen_bool(0.3) {
                    RoadEdge::dotted(weight)
                } else {
                    RoadEdge::new(weight)
                };
                graph
                    .add_edge(&i.to_string(), &j.to_string(), edge)
                    .unwrap();
                reference.add_edge(NodeIndex::new(i), NodeIndex::new(j), weight);
            }
        }
    }
    (RoadNetwork::new(graph, positions), reference)
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() <= EPS * a.abs().max(1.0), "{a} != {b}");
}

#[test]
fn fuzz() {
    const N: usize = 12;
    const N_GRAPHS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    let astar_solver = AstarSolver::new(Heuristic::Euclidean);

    for density in [0.1, 0.2, 0.4] {
        for _ in 0..N_GRAPHS {
            let (network, reference) = random_network(N, density, &mut rng);
            let start = rng.gen_range(0..N);
            let goal = rng.gen_range(0..N);
            let distances = dijkstra(&reference, NodeIndex::new(start), None, |e| *e.weight());
            let (start, goal) = (start.to_string(), goal.to_string());

            let astar_result = astar_solver.get_route_single_goal(&network, &start, &goal);
            let dijkstra_result = DijkstraSolver.get_route_single_goal(&network, &start, &goal);
            match distances.get(&NodeIndex::new(goal.parse().unwrap())) {
                Some(&optimal) => {
                    let astar_route = astar_result.unwrap();
                    let dijkstra_route = dijkstra_result.unwrap();
                    assert_close(astar_route.cost, optimal);
                    assert_close(dijkstra_route.cost, optimal);
                    assert!(astar_route.expanded <= dijkstra_route.expanded);

                    assert_eq!(astar_route.path.first(), Some(&start));
                    assert_eq!(astar_route.path.last(), Some(&goal));
                    let edges = path_to_edges(&astar_route.path);
                    assert_eq!(edges.len(), astar_route.path.len() - 1);
                    assert!(edges.iter().all(|(u, v)| network.graph.has_edge(u, v)));
                    let path_cost = astar_solver
                        .get_path_cost(&network.graph, &astar_route.path)
                        .unwrap();
                    assert_close(path_cost, astar_route.cost);
                }
                None => {
                    let no_path = PathError::NoPathFound {
                        start: start.clone(),
                        goal: goal.clone(),
                    };
                    assert_eq!(astar_result, Err(no_path.clone()));
                    assert_eq!(dijkstra_result, Err(no_path));
                }
            }
        }
    }
}

/// Paths never visit a node twice.
#[test]
fn fuzz_simple_paths() {
    const N: usize = 15;
    let mut rng = StdRng::seed_from_u64(1);
    let solver = AstarSolver::new(Heuristic::Euclidean);
    for _ in 0..1000 {
        let (network, _) = random_network(N, 0.3, &mut rng);
        let (start, goal) = (rng.gen_range(0..N).to_string(), rng.gen_range(0..N).to_string());
        if let Ok(mut path) = solver.get_path_single_goal(&network, &start, &goal) {
            let len = path.len();
            path.sort();
            path.dedup();
            assert_eq!(path.len(), len);
        }
    }
}

/// Running the same query twice gives the same path, with and without components.
#[test]
fn fuzz_idempotent() {
    const N: usize = 10;
    let mut rng = StdRng::seed_from_u64(2);
    for heuristic in [Heuristic::Zero, Heuristic::Euclidean, Heuristic::Manhattan] {
        let solver = AstarSolver::new(heuristic);
        for _ in 0..500 {
            let (mut network, _) = random_network(N, 0.25, &mut rng);
            let (start, goal) = (rng.gen_range(0..N).to_string(), rng.gen_range(0..N).to_string());
            let first = solver.get_route_single_goal(&network, &start, &goal);
            let second = solver.get_route_single_goal(&network, &start, &goal);
            assert_eq!(first, second);

            // Without up to date components an unreachable goal is found by flooding instead.
            network.graph.components_dirty = true;
            let flooded = solver.get_route_single_goal(&network, &start, &goal);
            match (&first, &flooded) {
                (Ok(a), Ok(b)) => assert_eq!(a.path, b.path),
                (Err(a), Err(b)) => assert_eq!(a, b),
                _ => panic!("{first:?} vs {flooded:?}"),
            }
        }
    }
}
