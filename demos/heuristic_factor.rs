use graph_pathfinding::config::GraphSettings;
use graph_pathfinding::{parse_graphml, AstarSolver, DijkstraSolver, GraphSolver, Heuristic};
use road_network_benchmark::{get_benchmark, NetworkShape};

// The heuristic_factor can be set to scale the heuristic, causing nodes that are closer to the goal
// (in a straight line) to be evaluated sooner than in normal operation. This is called Weighted A*
// and it can speed up the search at the price of returning a slightly longer route.

fn main() {
    let shape = NetworkShape {
        rows: 30,
        cols: 30,
        ..NetworkShape::default()
    };
    let (graphml, _) = get_benchmark(&shape, 0, 1);
    let network = parse_graphml(&graphml, &GraphSettings::default()).unwrap();
    println!(
        "Network: {} nodes, {} edges",
        network.graph.node_count(),
        network.graph.edge_count()
    );

    let start = "n0_0";
    let goal = "n29_29";
    let optimal = DijkstraSolver.get_route_single_goal(&network, start, goal);
    let Ok(optimal) = optimal else {
        println!("No path from {start} to {goal}");
        return;
    };
    println!("Dijkstra: cost {:.2}, {} expanded", optimal.cost, optimal.expanded);
    for factor in [1.0, 1.3, 2.0] {
        let solver = AstarSolver::new(Heuristic::Euclidean).with_heuristic_factor(factor);
        let route = solver.get_route_single_goal(&network, start, goal).unwrap();
        println!(
            "A* (factor {factor}): cost {:.2}, {} expanded",
            route.cost, route.expanded
        );
    }
}
