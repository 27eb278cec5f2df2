//! Heuristic strategies and the adapter binding a distance function to a position lookup.

use crate::distance::{euclidean_distance, manhattan_distance, DistanceFn, PositionLookup};
use crate::error::{PathError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A two-argument estimate `h(node, goal)` with its position lookup already bound.
pub type BoundHeuristic<'a> = Box<dyn Fn(&str, &str) -> Result<f64> + 'a>;

/// User supplied estimate, see [Heuristic::custom].
pub type CustomHeuristic = Arc<dyn Fn(&str, &str) -> f64 + Send + Sync>;

/// Binds `distance` to `positions`, producing a heuristic that only needs the two node ids.
pub fn bind_distance<'a>(
    distance: DistanceFn,
    positions: &'a PositionLookup,
) -> BoundHeuristic<'a> {
    Box::new(move |u, v| distance(u, v, positions))
}

/// The closed set of estimates the solvers accept.
#[derive(Clone, Default)]
pub enum Heuristic {
    /// Always 0, turning A* into uniform-cost search. Never reads positions.
    #[default]
    Zero,
    /// Straight-line distance. Admissible whenever no edge is cheaper than its length.
    Euclidean,
    /// Grid distance. Can overestimate on diagonal roads.
    Manhattan,
    Custom(CustomHeuristic),
}

impl Heuristic {
    pub fn custom<F>(f: F) -> Heuristic
    where
        F: Fn(&str, &str) -> f64 + Send + Sync + 'static,
    {
        Heuristic::Custom(Arc::new(f))
    }

    /// The distance function behind this heuristic, if it is position based.
    pub fn distance_fn(&self) -> Option<DistanceFn> {
        match self {
            Heuristic::Euclidean => Some(euclidean_distance),
            Heuristic::Manhattan => Some(manhattan_distance),
            Heuristic::Zero | Heuristic::Custom(_) => None,
        }
    }

    /// Binds the heuristic to `positions`. Estimates that are negative or NaN are rejected
    /// with [PathError::InvalidHeuristic].
    pub fn bind<'a>(&'a self, positions: &'a PositionLookup) -> BoundHeuristic<'a> {
        let inner: BoundHeuristic<'a> = match self {
            Heuristic::Zero => return Box::new(|_, _| Ok(0.0)),
            Heuristic::Euclidean => bind_distance(euclidean_distance, positions),
            Heuristic::Manhattan => bind_distance(manhattan_distance, positions),
            Heuristic::Custom(f) => Box::new(move |u, v| Ok(f(u, v))),
        };
        Box::new(move |u, v| {
            let value = inner(u, v)?;
            if value >= 0.0 {
                Ok(value)
            } else {
                Err(PathError::InvalidHeuristic {
                    node: u.to_owned(),
                    value,
                })
            }
        })
    }
}

impl fmt::Debug for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Heuristic::Zero => write!(f, "Zero"),
            Heuristic::Euclidean => write!(f, "Euclidean"),
            Heuristic::Manhattan => write!(f, "Manhattan"),
            Heuristic::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Heuristic choice as it appears in configuration files and on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    Zero,
    Euclidean,
    Manhattan,
}

impl From<HeuristicKind> for Heuristic {
    fn from(kind: HeuristicKind) -> Heuristic {
        match kind {
            HeuristicKind::Zero => Heuristic::Zero,
            HeuristicKind::Euclidean => Heuristic::Euclidean,
            HeuristicKind::Manhattan => Heuristic::Manhattan,
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" | "none" => Ok(HeuristicKind::Zero),
            "euclidean" => Ok(HeuristicKind::Euclidean),
            "manhattan" => Ok(HeuristicKind::Manhattan),
            other => Err(format!(
                "unknown heuristic {other:?}, expected zero, euclidean or manhattan"
            )),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            HeuristicKind::Zero => "zero",
            HeuristicKind::Euclidean => "euclidean",
            HeuristicKind::Manhattan => "manhattan",
        };
        write!(f, "{name}")
    }
}
