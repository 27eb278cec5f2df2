use graph_pathfinding::{
    AstarSolver, GraphSolver, Heuristic, Position, PositionLookup, RoadEdge, RoadGraph,
    RoadNetwork,
};

// In this example a path is found on a small road network
//
//   C
//   | \
//   |  \ (dotted, 5)
//   B---A
//
// A-B and B-C cost 1, the direct road A-C costs 5, so the route goes over B.
fn main() {
    let mut graph = RoadGraph::new(false);
    for id in ["A", "B", "C"] {
        graph.add_node(id);
    }
    graph.generate_components();
    graph.add_edge("A", "B", RoadEdge::new(1.0)).unwrap();
    graph.add_edge("B", "C", RoadEdge::new(1.0)).unwrap();
    graph.add_edge("A", "C", RoadEdge::dotted(5.0)).unwrap();

    let positions: PositionLookup = [
        ("A", Position::new(1.0, 0.0)),
        ("B", Position::new(0.0, 0.0)),
        ("C", Position::new(0.0, 1.0)),
    ]
    .into_iter()
    .collect();
    let network = RoadNetwork::new(graph, positions);

    let solver = AstarSolver::new(Heuristic::Euclidean);
    match solver.get_route_single_goal(&network, "A", "C") {
        Ok(route) => {
            println!("A path has been found:");
            for node in &route.path {
                println!("{node}");
            }
            println!("Cost: {}", route.cost);
        }
        Err(err) => println!("{err}"),
    }
}
