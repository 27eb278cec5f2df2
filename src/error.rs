//! Error types for searching, loading and configuring.

use thiserror::Error;

/// Failures of a path query. Every variant is surfaced to the caller; the search never turns
/// one into an empty or partial path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("node {0:?} is not part of the graph")]
    InvalidNode(String),

    #[error("node {0:?} has no position")]
    MissingPosition(String),

    #[error("no path exists from {start:?} to {goal:?}")]
    NoPathFound { start: String, goal: String },

    #[error("no edge connects {from:?} to {to:?}")]
    MissingEdge { from: String, to: String },

    #[error("heuristic returned {value} for node {node:?}")]
    InvalidHeuristic { node: String, value: f64 },
}

/// Failures while reading a GraphML road network.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read graph file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed GraphML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("<{element}> is missing the {attribute:?} attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("node {0:?} is declared twice")]
    DuplicateNode(String),

    #[error("edge {from:?} -> {to:?} references undeclared node {missing:?}")]
    UnknownEndpoint {
        from: String,
        to: String,
        missing: String,
    },

    #[error("edge {from:?} -> {to:?} has invalid weight {value:?}")]
    InvalidWeight {
        from: String,
        to: String,
        value: String,
    },

    #[error("edge {from:?} -> {to:?} does not match the direction of its graph")]
    MixedDirection { from: String, to: String },

    #[error(transparent)]
    Graph(#[from] PathError),
}

/// Failures while reading a TOML configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("heuristic factor must be finite and non-negative, got {0}")]
    InvalidHeuristicFactor(f64),
}

pub type Result<T> = std::result::Result<T, PathError>;
