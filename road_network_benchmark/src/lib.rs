use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write;

/// Shape of a synthetic road network: a jittered grid of intersections connected to their
/// right, lower and (sometimes) diagonal neighbours, with some roads removed.
#[derive(Clone, Debug)]
pub struct NetworkShape {
    pub rows: usize,
    pub cols: usize,
    /// Distance between neighbouring intersections before jitter
    pub spacing: f64,
    /// Maximum displacement of an intersection in each axis
    pub jitter: f64,
    /// Probability that a road is left out
    pub removal: f64,
    /// Probability that a diagonal road is added
    pub diagonal: f64,
    /// Probability that a road is drawn dotted
    pub dotted: f64,
    /// Road weights are the straight-line length times a factor drawn from this range
    pub detour: (f64, f64),
}

impl Default for NetworkShape {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            spacing: 10.0,
            jitter: 3.0,
            removal: 0.2,
            diagonal: 0.3,
            dotted: 0.25,
            detour: (1.05, 1.6),
        }
    }
}

pub fn node_id(row: usize, col: usize) -> String {
    format!("n{row}_{col}")
}

/// Generates a GraphML document for a random network of the given shape. The same seed always
/// produces the same document. Because no road is shorter than the straight line between its
/// endpoints, the Euclidean heuristic is admissible on these networks.
pub fn generate_graphml(shape: &NetworkShape, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions = Vec::with_capacity(shape.rows * shape.cols);
    for row in 0..shape.rows {
        for col in 0..shape.cols {
            let x = col as f64 * shape.spacing + rng.gen_range(-shape.jitter..=shape.jitter);
            let y = row as f64 * shape.spacing + rng.gen_range(-shape.jitter..=shape.jitter);
            positions.push((x, y));
        }
    }
    let position = |row: usize, col: usize| positions[row * shape.cols + col];

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(out, r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns">"#);
    let _ = writeln!(out, r#"  <key id="d0" for="node" attr.name="x" attr.type="double"/>"#);
    let _ = writeln!(out, r#"  <key id="d1" for="node" attr.name="y" attr.type="double"/>"#);
    let _ = writeln!(out, r#"  <key id="d2" for="edge" attr.name="weight" attr.type="double"/>"#);
    let _ = writeln!(out, r#"  <key id="d3" for="edge" attr.name="dotted" attr.type="boolean"/>"#);
    let _ = writeln!(out, r#"  <graph id="G" edgedefault="undirected">"#);
    for row in 0..shape.rows {
        for col in 0..shape.cols {
            let (x, y) = position(row, col);
            let _ = writeln!(
                out,
                r#"    <node id="{}"><data key="d0">{x}</data><data key="d1">{y}</data></node>"#,
                node_id(row, col)
            );
        }
    }
    for row in 0..shape.rows {
        for col in 0..shape.cols {
            let mut neighbours = vec![(row, col + 1), (row + 1, col)];
            if rng.gen_bool(shape.diagonal) {
                neighbours.push((row + 1, col + 1));
            }
            for (r, c) in neighbours {
                if r >= shape.rows || c >= shape.cols || rng.gen_bool(shape.removal) {
                    continue;
                }
                let (x1, y1) = position(row, col);
                let (x2, y2) = position(r, c);
                let length = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
                let weight = length * rng.gen_range(shape.detour.0..=shape.detour.1);
                let dotted = rng.gen_bool(shape.dotted);
                let _ = writeln!(
                    out,
                    r#"    <edge source="{}" target="{}"><data key="d2">{weight}</data><data key="d3">{dotted}</data></edge>"#,
                    node_id(row, col),
                    node_id(r, c)
                );
            }
        }
    }
    let _ = writeln!(out, "  </graph>");
    let _ = writeln!(out, "</graphml>");
    out
}

/// Random start and goal pairs on a network of the given shape.
pub fn generate_scenarios(
    shape: &NetworkShape,
    count: usize,
    seed: u64,
) -> Vec<(String, String)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pick = || node_id(rng.gen_range(0..shape.rows), rng.gen_range(0..shape.cols));
    (0..count).map(|_| (pick(), pick())).collect()
}

/// A network together with scenarios to run on it.
pub fn get_benchmark(
    shape: &NetworkShape,
    scenarios: usize,
    seed: u64,
) -> (String, Vec<(String, String)>) {
    (
        generate_graphml(shape, seed),
        generate_scenarios(shape, scenarios, seed.wrapping_add(1)),
    )
}
