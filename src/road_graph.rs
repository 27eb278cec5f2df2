use crate::astar::FxIndexMap;
use crate::distance::PositionLookup;
use crate::error::{PathError, Result};
use crate::Cost;
use core::fmt;
use log::info;
use ordered_float::OrderedFloat;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use petgraph::Direction::{Incoming, Outgoing};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadNode {
    pub id: String,
}

/// A road segment. `dotted` only affects how the segment is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadEdge {
    pub weight: f64,
    pub dotted: bool,
}

impl RoadEdge {
    pub fn new(weight: f64) -> RoadEdge {
        RoadEdge {
            weight,
            dotted: false,
        }
    }
    pub fn dotted(weight: f64) -> RoadEdge {
        RoadEdge {
            weight,
            dotted: true,
        }
    }
}

/// [RoadGraph] stores the road network in a [DiGraph] and keeps an index from string ids to
/// node indices. Undirected graphs store each edge once and expose it in both directions.
/// Connected components are maintained in a [UnionFind] structure so that queries between
/// disconnected parts of the network can be rejected without searching.
#[derive(Clone, Debug)]
pub struct RoadGraph {
    pub graph: DiGraph<RoadNode, RoadEdge>,
    pub directed: bool,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
    ids: FxIndexMap<String, NodeIndex>,
}

impl Default for RoadGraph {
    fn default() -> RoadGraph {
        RoadGraph::new(false)
    }
}

impl RoadGraph {
    pub fn new(directed: bool) -> RoadGraph {
        RoadGraph {
            graph: DiGraph::new(),
            directed,
            components: UnionFind::new(0),
            components_dirty: false,
            ids: FxIndexMap::default(),
        }
    }

    /// Adds a node if no node with this id exists yet and returns its index either way.
    pub fn add_node(&mut self, id: impl Into<String>) -> NodeIndex {
        let id = id.into();
        if let Some(&ix) = self.ids.get(&id) {
            return ix;
        }
        let ix = self.graph.add_node(RoadNode { id: id.clone() });
        self.ids.insert(id, ix);
        // The union-find structure has a fixed size, so it has to be rebuilt.
        self.components_dirty = true;
        ix
    }

    /// Adds an edge between two existing nodes. Fails with [PathError::InvalidNode] if either
    /// endpoint is unknown. Weights must be finite and non-negative.
    pub fn add_edge(&mut self, source: &str, target: &str, edge: RoadEdge) -> Result<EdgeIndex> {
        debug_assert!(edge.weight.is_finite() && edge.weight >= 0.0);
        let s = self.node_index(source)?;
        let t = self.node_index(target)?;
        if !self.components_dirty {
            self.components.union(s.index(), t.index());
        }
        Ok(self.graph.add_edge(s, t, edge))
    }

    pub fn node_index(&self, id: &str) -> Result<NodeIndex> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| PathError::InvalidNode(id.to_owned()))
    }
    pub fn node_id(&self, ix: NodeIndex) -> &str {
        &self.graph[ix].id
    }
    pub fn contains_node(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(|id| id.as_str())
    }
    /// All edges as stored, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &RoadEdge)> {
        self.graph.edge_references().map(move |e| {
            (
                self.node_id(e.source()),
                self.node_id(e.target()),
                e.weight(),
            )
        })
    }

    /// Neighbours reachable in one move together with the cost of that move.
    pub fn neighborhood_and_cost(&self, ix: NodeIndex) -> Vec<(NodeIndex, Cost)> {
        let outgoing = self
            .graph
            .edges_directed(ix, Outgoing)
            .map(|e| (e.target(), OrderedFloat(e.weight().weight)));
        if self.directed {
            outgoing.collect()
        } else {
            outgoing
                .chain(
                    self.graph
                        .edges_directed(ix, Incoming)
                        .map(|e| (e.source(), OrderedFloat(e.weight().weight))),
                )
                .collect()
        }
    }

    /// The edge that can be used to move from `from` to `to`, the cheapest one if there are
    /// parallel edges.
    pub fn find_edge(&self, from: &str, to: &str) -> Option<&RoadEdge> {
        let (u, v) = (self.node_index(from).ok()?, self.node_index(to).ok()?);
        let forward = self.graph.edges_connecting(u, v);
        let candidates: Vec<&RoadEdge> = if self.directed {
            forward.map(|e| e.weight()).collect()
        } else {
            forward
                .chain(self.graph.edges_connecting(v, u))
                .map(|e| e.weight())
                .collect()
        };
        candidates
            .into_iter()
            .min_by(|a, b| a.weight.total_cmp(&b.weight))
    }
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.find_edge(from, to).is_some()
    }

    /// Retrieves the component id a given node belongs to.
    pub fn get_component(&self, ix: NodeIndex) -> usize {
        self.components.find(ix.index())
    }
    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: NodeIndex, goal: NodeIndex) -> bool {
        !self.unreachable(start, goal)
    }
    /// Checks if start and goal are on different components. Components are weakly connected
    /// for directed graphs, so this never reports a reachable goal as unreachable. Dirty
    /// components are not consulted.
    pub fn unreachable(&self, start: NodeIndex, goal: NodeIndex) -> bool {
        if self.components_dirty {
            return false;
        }
        if self.components.equiv(start.index(), goal.index()) {
            false
        } else {
            info!(
                "{} and {} are on different components",
                self.node_id(start),
                self.node_id(goal)
            );
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }
    /// Generates a new [UnionFind] structure and joins the endpoints of every edge.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.graph.node_count());
        self.components_dirty = false;
        for e in self.graph.edge_references() {
            self.components.union(e.source().index(), e.target().index());
        }
    }
}

/// A loaded road network: the graph plus the positions of the nodes that have coordinates.
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    pub graph: RoadGraph,
    pub positions: PositionLookup,
}

impl RoadNetwork {
    pub fn new(graph: RoadGraph, positions: PositionLookup) -> RoadNetwork {
        RoadNetwork { graph, positions }
    }
}

impl fmt::Display for RoadGraph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let arrow = if self.directed { "->" } else { "--" };
        writeln!(
            f,
            "Graph: {} nodes, {} edges",
            self.node_count(),
            self.edge_count()
        )?;
        for (u, v, edge) in self.edges() {
            let style = if edge.dotted { " (dotted)" } else { "" };
            writeln!(f, "{u} {arrow} {v}: {}{style}", edge.weight)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_islands(directed: bool) -> RoadGraph {
        // a -- b -- c    d -- e
        let mut graph = RoadGraph::new(directed);
        for id in ["a", "b", "c", "d", "e"] {
            graph.add_node(id);
        }
        graph.generate_components();
        graph.add_edge("a", "b", RoadEdge::new(1.0)).unwrap();
        graph.add_edge("b", "c", RoadEdge::dotted(2.0)).unwrap();
        graph.add_edge("d", "e", RoadEdge::new(1.0)).unwrap();
        graph
    }

    #[test]
    fn node_ids_are_unique() {
        let mut graph = RoadGraph::new(false);
        let a = graph.add_node("a");
        assert_eq!(graph.add_node("a"), a);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node_id(a), "a");
    }

    #[test]
    fn edges_require_known_endpoints() {
        let mut graph = two_islands(false);
        assert_eq!(
            graph.add_edge("a", "z", RoadEdge::new(1.0)),
            Err(PathError::InvalidNode("z".to_owned()))
        );
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn undirected_neighborhood() {
        let graph = two_islands(false);
        let b = graph.node_index("b").unwrap();
        let mut neighbours = graph
            .neighborhood_and_cost(b)
            .into_iter()
            .map(|(n, c)| (graph.node_id(n).to_owned(), c.into_inner()))
            .collect::<Vec<_>>();
        neighbours.sort_by(|x, y| x.0.cmp(&y.0));
        assert_eq!(neighbours, vec![("a".to_owned(), 1.0), ("c".to_owned(), 2.0)]);
        assert!(graph.has_edge("c", "b"));
    }

    #[test]
    fn directed_neighborhood() {
        let graph = two_islands(true);
        let b = graph.node_index("b").unwrap();
        let neighbours = graph.neighborhood_and_cost(b);
        assert_eq!(neighbours.len(), 1);
        assert_eq!(graph.node_id(neighbours[0].0), "c");
        assert!(graph.has_edge("b", "c"));
        assert!(!graph.has_edge("c", "b"));
    }

    #[test]
    fn parallel_edges_use_cheapest() {
        let mut graph = two_islands(false);
        graph.add_edge("b", "a", RoadEdge::new(0.5)).unwrap();
        assert_eq!(graph.find_edge("a", "b").unwrap().weight, 0.5);
    }

    #[test]
    fn components() {
        let mut graph = two_islands(false);
        let [a, c, d, e] = ["a", "c", "d", "e"].map(|id| graph.node_index(id).unwrap());
        assert!(graph.reachable(a, c));
        assert!(graph.unreachable(a, e));
        assert_eq!(graph.get_component(d), graph.get_component(e));

        let f = graph.add_node("f");
        assert!(graph.components_dirty);
        // Dirty components are never used to reject a query.
        assert!(!graph.unreachable(a, e));
        graph.add_edge("e", "f", RoadEdge::new(1.0)).unwrap();
        graph.update();
        assert!(!graph.components_dirty);
        assert!(graph.reachable(d, f));
        assert!(graph.unreachable(c, f));
    }

    #[test]
    fn display_lists_edges() {
        let text = two_islands(true).to_string();
        assert!(text.starts_with("Graph: 5 nodes, 3 edges"));
        assert!(text.contains("b -> c: 2 (dotted)"));
    }
}
