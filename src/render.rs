//! Animated drawing of a route on top of its road network.
//!
//! An [Animation] has one frame per traversed edge plus a final frame. In frame `k` the first
//! `k` path edges are drawn as traversed, edge `k` as current and every other road keeps its
//! own style. [SvgRenderer] turns frames into SVG documents.

use crate::config::RenderSettings;
use crate::distance::Position;
use crate::road_graph::RoadNetwork;
use fxhash::FxHashMap;
use log::info;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

/// How an edge is drawn in a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeState {
    Solid,
    Dotted,
    Traversed,
    Current,
}

impl EdgeState {
    pub fn color(&self) -> &'static str {
        match self {
            EdgeState::Solid => "blue",
            EdgeState::Dotted => "orange",
            EdgeState::Traversed => "green",
            EdgeState::Current => "red",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameEdge<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub dotted: bool,
    pub state: EdgeState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame<'a> {
    pub index: usize,
    pub edges: Vec<FrameEdge<'a>>,
}

pub struct Animation<'a> {
    network: &'a RoadNetwork,
    start: &'a str,
    goal: &'a str,
    /// Position of each path edge in the route, keyed by its endpoints.
    steps: FxHashMap<(&'a str, &'a str), usize>,
    len: usize,
}

impl<'a> Animation<'a> {
    pub fn new(
        network: &'a RoadNetwork,
        path_edges: &'a [(String, String)],
        start: &'a str,
        goal: &'a str,
    ) -> Animation<'a> {
        let mut steps = FxHashMap::default();
        for (i, (u, v)) in path_edges.iter().enumerate() {
            steps.entry((u.as_str(), v.as_str())).or_insert(i);
            if !network.graph.directed {
                steps.entry((v.as_str(), u.as_str())).or_insert(i);
            }
        }
        Animation {
            network,
            start,
            goal,
            steps,
            len: path_edges.len(),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.len + 1
    }

    pub fn frame(&self, index: usize) -> Frame<'a> {
        let edges = self
            .network
            .graph
            .edges()
            .map(|(source, target, edge)| {
                let state = match self.steps.get(&(source, target)) {
                    Some(&i) if i < index => EdgeState::Traversed,
                    Some(&i) if i == index => EdgeState::Current,
                    _ if edge.dotted => EdgeState::Dotted,
                    _ => EdgeState::Solid,
                };
                FrameEdge {
                    source,
                    target,
                    dotted: edge.dotted,
                    state,
                }
            })
            .collect();
        Frame { index, edges }
    }

    pub fn frames(&self) -> impl Iterator<Item = Frame<'a>> + '_ {
        (0..self.frame_count()).map(move |i| self.frame(i))
    }
}

/// Maps network coordinates onto the canvas, keeping the aspect ratio and pointing the y axis
/// up.
struct Projection {
    min: Position,
    max: Position,
    scale: f64,
    margin: f64,
}

impl Projection {
    fn new(network: &RoadNetwork, settings: &RenderSettings) -> Projection {
        let (min, max) = network
            .positions
            .bounds()
            .unwrap_or((Position::default(), Position::default()));
        let span_x = (max.x - min.x).max(f64::EPSILON);
        let span_y = (max.y - min.y).max(f64::EPSILON);
        let scale = ((settings.width - 2.0 * settings.margin) / span_x)
            .min((settings.height - 2.0 * settings.margin) / span_y);
        Projection {
            min,
            max,
            scale,
            margin: settings.margin,
        }
    }

    fn project(&self, p: &Position) -> (f64, f64) {
        (
            self.margin + (p.x - self.min.x) * self.scale,
            self.margin + (self.max.y - p.y) * self.scale,
        )
    }
}

pub struct SvgRenderer {
    pub settings: RenderSettings,
}

impl SvgRenderer {
    pub fn new(settings: RenderSettings) -> SvgRenderer {
        SvgRenderer { settings }
    }

    /// Draws a single frame: the roads, then all nodes, then start and goal on top.
    pub fn render_frame(&self, animation: &Animation, frame: &Frame) -> String {
        let network = animation.network;
        let projection = Projection::new(network, &self.settings);
        let mut svg = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.settings.width, self.settings.height, self.settings.width, self.settings.height
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        for edge in &frame.edges {
            let (Ok(a), Ok(b)) = (
                network.positions.get(edge.source),
                network.positions.get(edge.target),
            ) else {
                continue;
            };
            let ((x1, y1), (x2, y2)) = (projection.project(&a), projection.project(&b));
            let (width, dash) = if edge.dotted {
                (1.0, r#" stroke-dasharray="6 4""#)
            } else {
                (1.5, "")
            };
            let _ = writeln!(
                svg,
                r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{width}" stroke-opacity="0.7"{dash}/>"#,
                edge.state.color()
            );
        }
        for (_, p) in network.positions.iter() {
            let (x, y) = projection.project(p);
            let _ = writeln!(svg, r#"<circle cx="{x:.2}" cy="{y:.2}" r="2" fill="blue"/>"#);
        }
        for (id, color) in [(animation.start, "green"), (animation.goal, "red")] {
            if let Ok(p) = network.positions.get(id) {
                let (x, y) = projection.project(&p);
                let _ = writeln!(svg, r#"<circle cx="{x:.2}" cy="{y:.2}" r="4" fill="{color}"/>"#);
            }
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Writes every frame of the animation to `dir` as `frame_0000.svg`, `frame_0001.svg`, ...
    /// and returns the number of frames written.
    pub fn write_frames(&self, animation: &Animation, dir: &Path) -> io::Result<usize> {
        fs::create_dir_all(dir)?;
        let mut count = 0;
        for frame in animation.frames() {
            let path = dir.join(format!("frame_{:04}.svg", frame.index));
            fs::write(&path, self.render_frame(animation, &frame))?;
            count += 1;
        }
        info!("Wrote {} frames to {}", count, dir.display());
        Ok(count)
    }
}

/// Renders the animation of `path_edges` from `start` to `goal` into `settings.output_dir`.
pub fn render_route(
    network: &RoadNetwork,
    path_edges: &[(String, String)],
    start: &str,
    goal: &str,
    settings: &RenderSettings,
) -> io::Result<usize> {
    let animation = Animation::new(network, path_edges, start, goal);
    SvgRenderer::new(settings.clone()).write_frames(&animation, &settings.output_dir)
}
