use anyhow::Context;
use clap::Parser;
use graph_pathfinding::config::{RenderSettings, RouteConfig, SearchSettings};
use graph_pathfinding::render::render_route;
use graph_pathfinding::{
    load_graph, path_to_edges, run_search, DijkstraSolver, GraphSolver, HeuristicKind, PathError,
    RoadNetwork, Route,
};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Finds a shortest route through a GraphML road network and renders it as SVG frames.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GraphML file describing the road network
    graph: PathBuf,

    /// Start node, prompted for when omitted
    #[arg(short, long)]
    start: Option<String>,

    /// Goal node, prompted for when omitted
    #[arg(short, long)]
    goal: Option<String>,

    /// Estimate guiding the search: zero, euclidean or manhattan
    #[arg(long)]
    heuristic: Option<HeuristicKind>,

    /// Multiplier for the estimate (values above 1.0 give up optimality for speed)
    #[arg(long)]
    heuristic_factor: Option<f64>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the SVG frames are written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip rendering and only print the route
    #[arg(long)]
    no_render: bool,

    #[arg(short, long)]
    debug: bool,
}

fn prompt(message: &str) -> anyhow::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

/// Runs the configured search. A heuristic that needs a position the network does not have
/// is retried once with the zero heuristic.
fn search(
    network: &RoadNetwork,
    settings: &SearchSettings,
    start: &str,
    goal: &str,
) -> Result<Route, PathError> {
    match run_search(network, settings, start, goal) {
        Err(PathError::MissingPosition(node)) if settings.heuristic != HeuristicKind::Zero => {
            warn!(
                "Node {} has no position, retrying without a heuristic",
                node
            );
            DijkstraSolver.get_route_single_goal(network, start, goal)
        }
        result => result,
    }
}

fn render(
    network: &RoadNetwork,
    route: &Route,
    start: &str,
    goal: &str,
    settings: &RenderSettings,
) -> anyhow::Result<()> {
    let edges = path_to_edges(&route.path);
    render_route(network, &edges, start, goal, settings).with_context(|| {
        format!(
            "could not write frames to {}",
            settings.output_dir.display()
        )
    })?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        })
        .init();

    let mut config = match &cli.config {
        Some(path) => RouteConfig::load(path)
            .with_context(|| format!("could not load {}", path.display()))?,
        None => RouteConfig::default(),
    };
    if let Some(heuristic) = cli.heuristic {
        config.search.heuristic = heuristic;
    }
    if let Some(factor) = cli.heuristic_factor {
        config.search.heuristic_factor = factor;
    }
    if let Some(output) = cli.output {
        config.render.output_dir = output;
    }
    config.search.validate()?;
    if config.search.heuristic == HeuristicKind::Manhattan {
        warn!(
            "The Manhattan heuristic can overestimate on diagonal roads, \
             the route may not be the shortest"
        );
    }

    let network = load_graph(&cli.graph, &config.graph)
        .with_context(|| format!("could not load {}", cli.graph.display()))?;

    let start = match cli.start {
        Some(start) => start,
        None => prompt("Enter the start node: ")?,
    };
    let goal = match cli.goal {
        Some(goal) => goal,
        None => prompt("Enter the goal node: ")?,
    };

    let route = search(&network, &config.search, &start, &goal)?;
    println!("Path: {}", route.path.join(" -> "));
    println!("Cost: {}", route.cost);

    if cli.no_render {
        info!("Rendering disabled");
    } else {
        render(&network, &route, &start, &goal, &config.render)?;
    }
    Ok(())
}
