//! Configuration for the scoring engine and path output.
//!
//! Configuration is plain JSON. The ordered `edge_cost_functions` list names
//! the scorers to run; each name may have a table under `scorers` selecting
//! the cost model (`plugin`), its `weight`, and any model-specific options.
//! A name without a table resolves directly to the cost model of that name.
//!
//! ```json
//! {
//!   "route_frame": "map",
//!   "path_density": 0.05,
//!   "max_planning_time": 2.0,
//!   "scoring": {
//!     "edge_cost_functions": ["DistanceScorer", "Hazards"],
//!     "scorers": {
//!       "Hazards": {
//!         "plugin": "CostmapScorer",
//!         "weight": 2.0,
//!         "use_maximum": false
//!       }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path as FsPath;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Scorers used when a configuration does not list any.
pub const DEFAULT_EDGE_COST_FUNCTIONS: [&str; 2] = ["DistanceScorer", "AdjustEdgesScorer"];

pub const DEFAULT_WEIGHT: f64 = 1.0;
pub const DEFAULT_ROUTE_FRAME: &str = "map";
pub const DEFAULT_PATH_DENSITY: f64 = 0.05;
pub const DEFAULT_MAX_PLANNING_TIME: f64 = 2.0;

fn default_edge_cost_functions() -> Vec<String> {
    DEFAULT_EDGE_COST_FUNCTIONS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

fn default_route_frame() -> String {
    DEFAULT_ROUTE_FRAME.to_string()
}

fn default_path_density() -> f64 {
    DEFAULT_PATH_DENSITY
}

fn default_max_planning_time() -> f64 {
    DEFAULT_MAX_PLANNING_TIME
}

/// Settings for a single named scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Cost model to instantiate. Defaults to the scorer's configured name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    /// Multiplier applied to this scorer's raw cost.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Model-specific options, deserialized by the scorer itself.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            plugin: None,
            weight: DEFAULT_WEIGHT,
            options: Map::new(),
        }
    }
}

impl ScorerConfig {
    /// Table selecting the given cost model.
    pub fn plugin(plugin: impl Into<String>) -> Self {
        Self {
            plugin: Some(plugin.into()),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Deserialize the option table into a scorer's typed options.
    pub fn options<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        serde_json::from_value(Value::Object(self.options.clone())).map_err(|source| {
            Error::InvalidScorerOptions {
                name: name.to_string(),
                source,
            }
        })
    }
}

/// Ordered scorer list plus per-scorer tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_edge_cost_functions")]
    pub edge_cost_functions: Vec<String>,
    #[serde(default)]
    pub scorers: BTreeMap<String, ScorerConfig>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            edge_cost_functions: default_edge_cost_functions(),
            scorers: BTreeMap::new(),
        }
    }
}

impl ScoringConfig {
    /// Configuration running exactly the named scorers, in order.
    pub fn with_scorers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            edge_cost_functions: names.into_iter().map(Into::into).collect(),
            scorers: BTreeMap::new(),
        }
    }

    /// Attach a table for `name`, replacing any previous one.
    pub fn with_scorer(mut self, name: impl Into<String>, config: ScorerConfig) -> Self {
        self.scorers.insert(name.into(), config);
        self
    }

    /// Table for `name`, or the defaults when none was given.
    pub fn scorer(&self, name: &str) -> ScorerConfig {
        self.scorers.get(name).cloned().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        for (name, scorer) in &self.scorers {
            if !scorer.weight.is_finite() {
                return Err(Error::invalid(format!(
                    "weight of scorer {} must be finite, got {}",
                    name, scorer.weight
                )));
            }
        }
        Ok(())
    }
}

/// Top-level configuration: scoring plus path output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Frame tag attached to produced paths.
    #[serde(default = "default_route_frame")]
    pub route_frame: String,
    /// Spacing between densified path points, in metres.
    #[serde(default = "default_path_density")]
    pub path_density: f64,
    /// Planning cycle budget in seconds; `0` disables the check.
    #[serde(default = "default_max_planning_time")]
    pub max_planning_time: f64,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            route_frame: default_route_frame(),
            path_density: DEFAULT_PATH_DENSITY,
            max_planning_time: DEFAULT_MAX_PLANNING_TIME,
            scoring: ScoringConfig::default(),
        }
    }
}

impl RouteConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RouteConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_path(path: &FsPath) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.path_density.is_finite() || self.path_density <= 0.0 {
            return Err(Error::invalid(format!(
                "path_density must be finite and positive, got {}",
                self.path_density
            )));
        }

        if !self.max_planning_time.is_finite() || self.max_planning_time < 0.0 {
            return Err(Error::invalid(format!(
                "max_planning_time must be finite and non-negative, got {}",
                self.max_planning_time
            )));
        }

        self.scoring.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = RouteConfig::from_json_str("{}").expect("defaults are valid");
        assert_eq!(config.route_frame, "map");
        assert_eq!(config.path_density, 0.05);
        assert_eq!(config.max_planning_time, 2.0);
        assert_eq!(
            config.scoring.edge_cost_functions,
            vec!["DistanceScorer", "AdjustEdgesScorer"]
        );
    }

    #[test]
    fn scorer_table_keeps_model_options() {
        let config = RouteConfig::from_json_str(
            r#"{
                "scoring": {
                    "edge_cost_functions": ["Hazards"],
                    "scorers": {
                        "Hazards": {"plugin": "CostmapScorer", "weight": 2.5, "use_maximum": false}
                    }
                }
            }"#,
        )
        .expect("config parses");

        let hazards = config.scoring.scorer("Hazards");
        assert_eq!(hazards.plugin.as_deref(), Some("CostmapScorer"));
        assert_eq!(hazards.weight, 2.5);
        assert_eq!(hazards.options.get("use_maximum"), Some(&Value::Bool(false)));
    }

    #[test]
    fn missing_table_defaults_to_unit_weight() {
        let config = ScoringConfig::with_scorers(["PenaltyScorer"]);
        let table = config.scorer("PenaltyScorer");
        assert!(table.plugin.is_none());
        assert_eq!(table.weight, 1.0);
        assert!(table.options.is_empty());
    }

    #[test]
    fn rejects_non_positive_density() {
        let err = RouteConfig::from_json_str(r#"{"path_density": 0.0}"#)
            .expect_err("zero density is invalid");
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn rejects_negative_planning_budget() {
        assert!(RouteConfig::from_json_str(r#"{"max_planning_time": -1.0}"#).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("route.json");
        fs::write(&path, r#"{"route_frame": "odom"}"#).expect("write config");
        let config = RouteConfig::from_path(&path).expect("config loads");
        assert_eq!(config.route_frame, "odom");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RouteConfig::from_path(FsPath::new("/nonexistent/route.json"))
            .expect_err("file is missing");
        assert!(err.to_string().contains("/nonexistent/route.json"));
    }
}
