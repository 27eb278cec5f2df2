//! Configuration of the loader, the search and the renderer.
//!
//! Every field has a default, so an empty file (or no file at all) is a valid configuration:
//!
//! ```toml
//! [search]
//! heuristic = "euclidean"
//! heuristic_factor = 1.0
//!
//! [graph]
//! weight_key = "length"
//!
//! [render]
//! output_dir = "frames"
//! ```

use crate::error::ConfigError;
use crate::heuristic::HeuristicKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RouteConfig {
    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub graph: GraphSettings,

    #[serde(default)]
    pub render: RenderSettings,
}

impl RouteConfig {
    pub fn from_toml_str(text: &str) -> Result<RouteConfig, ConfigError> {
        let config: RouteConfig = toml::from_str(text)?;
        config.search.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<RouteConfig, ConfigError> {
        RouteConfig::from_toml_str(&fs::read_to_string(path)?)
    }
}

/// Search settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Estimate used to guide the search
    pub heuristic: HeuristicKind,

    /// Multiplier for the estimate (1.0 = plain A*)
    pub heuristic_factor: f64,
}

impl SearchSettings {
    /// Rejects heuristic factors that are NaN, infinite or negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heuristic_factor.is_finite() && self.heuristic_factor >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidHeuristicFactor(self.heuristic_factor))
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            heuristic: HeuristicKind::Euclidean,
            heuristic_factor: 1.0,
        }
    }
}

/// Names of the GraphML attributes read by the loader
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub x_key: String,
    pub y_key: String,

    /// Edge cost; edges without it cost `default_weight`
    pub weight_key: String,
    pub default_weight: f64,

    /// Marks edges drawn with a dashed line
    pub dotted_key: String,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            x_key: "x".to_owned(),
            y_key: "y".to_owned(),
            weight_key: "weight".to_owned(),
            default_weight: 1.0,
            dotted_key: "dotted".to_owned(),
        }
    }
}

/// SVG output settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Canvas size in pixels
    pub width: f64,
    pub height: f64,

    /// Empty border around the drawing
    pub margin: f64,

    pub output_dir: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
            margin: 20.0,
            output_dir: PathBuf::from("frames"),
        }
    }
}
