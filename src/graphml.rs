//! Reads road networks from GraphML.
//!
//! Attribute handling is decided here, once, so the rest of the crate only sees typed values:
//!
//! * node coordinates that are missing, malformed or not finite leave the node in the graph
//!   but out of the [PositionLookup];
//! * edge weights default to [GraphSettings::default_weight] and must otherwise be finite and
//!   non-negative;
//! * the dotted flag defaults to `false`;
//! * an edge's `directed` attribute must agree with the `edgedefault` of its graph.

use crate::config::GraphSettings;
use crate::distance::{Position, PositionLookup};
use crate::error::LoadError;
use crate::road_graph::{RoadEdge, RoadGraph, RoadNetwork};
use fxhash::FxHashMap;
use log::{debug, info, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// Reads and parses the GraphML file at `path`.
pub fn load_graph(
    path: impl AsRef<Path>,
    settings: &GraphSettings,
) -> Result<RoadNetwork, LoadError> {
    let path = path.as_ref();
    info!("Loading road network from {}", path.display());
    let text = fs::read_to_string(path)?;
    parse_graphml(&text, settings)
}

/// Parses a GraphML document into a [RoadNetwork].
pub fn parse_graphml(text: &str, settings: &GraphSettings) -> Result<RoadNetwork, LoadError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);
    let mut document = Document::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => document.start(&e, false)?,
            Event::Empty(e) => document.start(&e, true)?,
            Event::End(e) => document.end(e.local_name().as_ref()),
            Event::Text(t) => document.text(&t.unescape()?),
            Event::CData(c) => document.text(&String::from_utf8_lossy(&c.into_inner())),
            Event::Eof => break,
            _ => {}
        }
    }
    document.build(settings)
}

/// A `<key>` declaration.
#[derive(Debug, Default)]
struct Key {
    domain: String,
    name: String,
    default: Option<String>,
}

#[derive(Debug, Default)]
struct NodeRecord {
    id: String,
    data: FxHashMap<String, String>,
}

#[derive(Debug, Default)]
struct EdgeRecord {
    source: String,
    target: String,
    directed: Option<bool>,
    data: FxHashMap<String, String>,
}

#[derive(Debug)]
enum Open {
    Node(NodeRecord),
    Edge(EdgeRecord),
}

/// Raw document contents, collected before any validation.
#[derive(Debug, Default)]
struct Document {
    keys: FxHashMap<String, Key>,
    directed: bool,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    open: Option<Open>,
    open_key: Option<String>,
    open_data: Option<String>,
    in_default: bool,
    text: String,
}

fn attribute(e: &BytesStart, name: &str) -> Result<Option<String>, LoadError> {
    match e.try_get_attribute(name).map_err(quick_xml::Error::from)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn required(
    e: &BytesStart,
    element: &'static str,
    name: &'static str,
) -> Result<String, LoadError> {
    attribute(e, name)?.ok_or(LoadError::MissingAttribute {
        element,
        attribute: name,
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}

fn parse_coordinate(raw: Option<&String>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Document {
    fn start(&mut self, e: &BytesStart, empty: bool) -> Result<(), LoadError> {
        match e.local_name().as_ref() {
            b"key" => {
                let id = required(e, "key", "id")?;
                let key = Key {
                    domain: attribute(e, "for")?.unwrap_or_else(|| "all".to_owned()),
                    name: attribute(e, "attr.name")?.unwrap_or_else(|| id.clone()),
                    default: None,
                };
                self.keys.insert(id.clone(), key);
                if !empty {
                    self.open_key = Some(id);
                }
            }
            b"default" if !empty => {
                self.in_default = true;
                self.text.clear();
            }
            b"graph" => {
                self.directed = attribute(e, "edgedefault")?.as_deref() == Some("directed");
            }
            b"node" => {
                let node = NodeRecord {
                    id: required(e, "node", "id")?,
                    data: FxHashMap::default(),
                };
                if empty {
                    self.nodes.push(node);
                } else {
                    self.open = Some(Open::Node(node));
                }
            }
            b"edge" => {
                let edge = EdgeRecord {
                    source: required(e, "edge", "source")?,
                    target: required(e, "edge", "target")?,
                    directed: attribute(e, "directed")?.as_deref().and_then(parse_bool),
                    data: FxHashMap::default(),
                };
                if empty {
                    self.edges.push(edge);
                } else {
                    self.open = Some(Open::Edge(edge));
                }
            }
            b"data" if !empty => {
                self.open_data = Some(required(e, "data", "key")?);
                self.text.clear();
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.open_data.is_some() || self.in_default {
            self.text.push_str(text);
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"key" => self.open_key = None,
            b"default" => {
                self.in_default = false;
                if let Some(key) = self.open_key.as_ref().and_then(|id| self.keys.get_mut(id)) {
                    key.default = Some(std::mem::take(&mut self.text));
                }
            }
            b"data" => {
                if let Some(id) = self.open_data.take() {
                    let name = self.keys.get(&id).map_or(id, |key| key.name.clone());
                    let value = std::mem::take(&mut self.text);
                    match &mut self.open {
                        Some(Open::Node(node)) => {
                            node.data.insert(name, value);
                        }
                        Some(Open::Edge(edge)) => {
                            edge.data.insert(name, value);
                        }
                        // Graph level data is not used.
                        None => {}
                    }
                }
            }
            b"node" | b"edge" => match self.open.take() {
                Some(Open::Node(node)) => self.nodes.push(node),
                Some(Open::Edge(edge)) => self.edges.push(edge),
                None => {}
            },
            _ => {}
        }
    }

    /// Attribute value of an element, falling back to the key's default.
    fn value<'a>(
        &'a self,
        data: &'a FxHashMap<String, String>,
        domain: &str,
        name: &str,
    ) -> Option<&'a String> {
        data.get(name).or_else(|| {
            self.keys
                .values()
                .find(|key| key.name == name && (key.domain == domain || key.domain == "all"))
                .and_then(|key| key.default.as_ref())
        })
    }

    fn build(self, settings: &GraphSettings) -> Result<RoadNetwork, LoadError> {
        let mut graph = RoadGraph::new(self.directed);
        let mut positions = PositionLookup::new();
        for node in &self.nodes {
            if graph.contains_node(&node.id) {
                return Err(LoadError::DuplicateNode(node.id.clone()));
            }
            graph.add_node(node.id.as_str());
            let x = parse_coordinate(self.value(&node.data, "node", &settings.x_key));
            let y = parse_coordinate(self.value(&node.data, "node", &settings.y_key));
            match (x, y) {
                (Some(x), Some(y)) => {
                    positions.insert(node.id.as_str(), Position::new(x, y));
                }
                _ => debug!("Node {} has no valid position", node.id),
            }
        }
        graph.generate_components();

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !graph.contains_node(endpoint) {
                    return Err(LoadError::UnknownEndpoint {
                        from: edge.source.clone(),
                        to: edge.target.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            let weight = match self.value(&edge.data, "edge", &settings.weight_key) {
                None => settings.default_weight,
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|w| w.is_finite() && *w >= 0.0)
                    .ok_or_else(|| LoadError::InvalidWeight {
                        from: edge.source.clone(),
                        to: edge.target.clone(),
                        value: raw.clone(),
                    })?,
            };
            let dotted = match self.value(&edge.data, "edge", &settings.dotted_key) {
                None => false,
                Some(raw) => parse_bool(raw).unwrap_or_else(|| {
                    warn!(
                        "Edge {} -> {} has unreadable {} value {:?}, drawing it solid",
                        edge.source, edge.target, settings.dotted_key, raw
                    );
                    false
                }),
            };
            if edge.directed.is_some_and(|directed| directed != self.directed) {
                return Err(LoadError::MixedDirection {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                });
            }
            graph.add_edge(&edge.source, &edge.target, RoadEdge { weight, dotted })?;
        }

        let skipped = graph.node_count() - positions.len();
        if skipped > 0 {
            warn!("{} nodes have no valid position and are not drawn", skipped);
        }
        info!(
            "Loaded {} nodes ({} with positions) and {} edges",
            graph.node_count(),
            positions.len(),
            graph.edge_count()
        );
        Ok(RoadNetwork::new(graph, positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathError;

    const TRACK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
  <key id="d0" for="node" attr.name="x" attr.type="double"/>
  <key id="d1" for="node" attr.name="y" attr.type="double"/>
  <key id="d2" for="edge" attr.name="dotted" attr.type="boolean">
    <default>false</default>
  </key>
  <key id="d3" for="edge" attr.name="weight" attr.type="double"/>
  <graph id="G" edgedefault="directed">
    <node id="1"><data key="d0">0.0</data><data key="d1">0.0</data></node>
    <node id="2"><data key="d0">3.0</data><data key="d1">4.0</data></node>
    <node id="3"><data key="d0">6.0</data><data key="d1">NaN</data></node>
    <node id="4"/>
    <edge source="1" target="2"><data key="d2">True</data></edge>
    <edge source="2" target="3"><data key="d3">2.5</data></edge>
    <edge source="3" target="4" directed="true"><data key="d2">maybe</data></edge>
  </graph>
</graphml>"#;

    #[test]
    fn reads_nodes_and_positions() {
        let network = parse_graphml(TRACK, &GraphSettings::default()).unwrap();
        assert_eq!(network.graph.node_count(), 4);
        assert!(network.graph.directed);
        assert_eq!(network.positions.len(), 2);
        assert_eq!(network.positions.get("2").unwrap(), Position::new(3.0, 4.0));
        assert_eq!(
            network.positions.get("3"),
            Err(PathError::MissingPosition("3".to_owned()))
        );
        assert!(!network.positions.contains("4"));
    }

    #[test]
    fn reads_edge_attributes() {
        let network = parse_graphml(TRACK, &GraphSettings::default()).unwrap();
        let graph = &network.graph;
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(*graph.find_edge("1", "2").unwrap(), RoadEdge::dotted(1.0));
        assert_eq!(*graph.find_edge("2", "3").unwrap(), RoadEdge::new(2.5));
        // Unreadable dotted values are drawn solid.
        assert_eq!(*graph.find_edge("3", "4").unwrap(), RoadEdge::new(1.0));
        assert!(!graph.has_edge("4", "3"));
        assert!(!graph.has_edge("2", "1"));
    }

    #[test]
    fn custom_keys() {
        let text = r#"<graphml>
  <key id="len" for="edge" attr.name="length"/>
  <graph edgedefault="undirected">
    <node id="a"/><node id="b"/>
    <edge source="a" target="b"><data key="len">7</data></edge>
  </graph>
</graphml>"#;
        let settings = GraphSettings {
            weight_key: "length".to_owned(),
            ..GraphSettings::default()
        };
        let network = parse_graphml(text, &settings).unwrap();
        assert!(!network.graph.directed);
        assert_eq!(network.graph.find_edge("b", "a").unwrap().weight, 7.0);
        assert!(network.positions.is_empty());
    }

    #[test]
    fn rejects_unknown_endpoint() {
        let text = r#"<graphml><graph edgedefault="undirected">
    <node id="a"/>
    <edge source="a" target="b"/>
  </graph></graphml>"#;
        let result = parse_graphml(text, &GraphSettings::default());
        assert!(matches!(
            result,
            Err(LoadError::UnknownEndpoint { ref missing, .. }) if missing == "b"
        ));
    }

    /// An edge whose direction contradicts the graph's edgedefault is rejected in both
    /// directions.
    #[test]
    fn rejects_mixed_direction() {
        for (edgedefault, directed) in [("undirected", "true"), ("directed", "false")] {
            let text = format!(
                r#"<graphml><graph edgedefault="{edgedefault}">
    <node id="a"/><node id="b"/>
    <edge source="a" target="b" directed="{directed}"/>
  </graph></graphml>"#
            );
            let result = parse_graphml(&text, &GraphSettings::default());
            assert!(matches!(
                result,
                Err(LoadError::MixedDirection { ref from, ref to }) if from == "a" && to == "b"
            ));
        }
        let agreeing = r#"<graphml><graph edgedefault="undirected">
    <node id="a"/><node id="b"/>
    <edge source="a" target="b" directed="false"/>
  </graph></graphml>"#;
        let network = parse_graphml(agreeing, &GraphSettings::default()).unwrap();
        assert!(network.graph.has_edge("b", "a"));
    }

    #[test]
    fn rejects_bad_weights() {
        let text = r#"<graphml>
  <key id="w" for="edge" attr.name="weight"/>
  <graph edgedefault="undirected">
    <node id="a"/><node id="b"/>
    <edge source="a" target="b"><data key="w">-1</data></edge>
  </graph>
</graphml>"#;
        let result = parse_graphml(text, &GraphSettings::default());
        assert!(matches!(result, Err(LoadError::InvalidWeight { .. })));
    }

    #[test]
    fn rejects_duplicates_and_missing_ids() {
        let duplicate = r#"<graphml><graph><node id="a"/><node id="a"/></graph></graphml>"#;
        assert!(matches!(
            parse_graphml(duplicate, &GraphSettings::default()),
            Err(LoadError::DuplicateNode(_))
        ));
        let anonymous = r#"<graphml><graph><node/></graph></graphml>"#;
        assert!(matches!(
            parse_graphml(anonymous, &GraphSettings::default()),
            Err(LoadError::MissingAttribute {
                element: "node",
                attribute: "id"
            })
        ));
    }

    #[test]
    fn missing_file() {
        let result = load_graph("does/not/exist.graphml", &GraphSettings::default());
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
