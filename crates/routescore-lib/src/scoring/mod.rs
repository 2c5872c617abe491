//! Edge scoring for route planning.
//!
//! This module provides:
//! - [`EdgeScorer`] - The capability every cost model implements
//! - [`ScorerKind`] - The closed set of available cost models
//! - [`ScoringEngine`] - Ordered, weighted composition of configured scorers
//! - [`ScoreResult`] - Outcome of scoring one edge
//!
//! # Strategy Pattern
//!
//! Each cost model (distance, penalty, time, semantic, costmap, dynamic
//! adjustment) is encapsulated in its own scorer struct behind the
//! [`EdgeScorer`] trait. The engine builds them by name from the ordered
//! `edge_cost_functions` list and never needs to know which models it holds.
//!
//! # Aggregation
//!
//! Scorers run in configured order. The first scorer that rejects an edge
//! ends evaluation and the edge is reported as not traversable; otherwise the
//! result is the weighted sum of every scorer's raw cost.
//!
//! # Example
//!
//! ```
//! use routescore_lib::{DirectionalEdge, Node, ScoringConfig, ScoringEngine};
//!
//! let engine = ScoringEngine::new(&ScoringConfig::default())?;
//! assert_eq!(engine.num_plugins(), 2);
//!
//! let a = Node::new(1, 0.0, 0.0);
//! let b = Node::new(2, 3.0, 4.0);
//! let edge = DirectionalEdge::new(10, &a, &b);
//! assert_eq!(engine.score(&edge).cost(), Some(5.0));
//! # Ok::<(), routescore_lib::Error>(())
//! ```

mod adjust_edges;
mod costmap;
mod distance;
mod penalty;
mod scorer;
mod semantic;
mod time;

pub use adjust_edges::{
    AdjustEdgesHandle, AdjustEdgesRequest, AdjustEdgesResponse, AdjustEdgesScorer,
    EdgeAdjustment,
};
pub use costmap::{CostmapOptions, CostmapScorer};
pub use distance::{DistanceOptions, DistanceScorer};
pub use penalty::{PenaltyOptions, PenaltyScorer};
pub use scorer::{EdgeScorer, ScorerKind};
pub use semantic::{SemanticOptions, SemanticScorer};
pub use time::{TimeOptions, TimeScorer};

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ScoringConfig;
use crate::costmap::{Costmap, CostmapHandle};
use crate::error::{Error, Result};
use crate::graph::DirectionalEdge;

use scorer::{build_scorer, ScorerHandles};

/// Outcome of scoring one edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Whether the edge may be used at all.
    pub traversable: bool,
    /// Weighted cost. Meaningless when `traversable` is `false`.
    pub cost: f64,
}

impl ScoreResult {
    pub fn with_cost(cost: f64) -> Self {
        Self {
            traversable: true,
            cost,
        }
    }

    pub fn not_traversable() -> Self {
        Self {
            traversable: false,
            cost: f64::INFINITY,
        }
    }

    pub fn is_traversable(&self) -> bool {
        self.traversable
    }

    /// Cost of a traversable edge, `None` otherwise.
    pub fn cost(&self) -> Option<f64> {
        self.traversable.then_some(self.cost)
    }
}

struct ConfiguredScorer {
    name: String,
    weight: f64,
    scorer: Box<dyn EdgeScorer>,
}

impl fmt::Debug for ConfiguredScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredScorer")
            .field("name", &self.name)
            .field("kind", &self.scorer.kind())
            .field("weight", &self.weight)
            .finish()
    }
}

/// Composite scorer evaluating an ordered list of weighted cost models.
///
/// The engine holds no per-call state. It is `Send + Sync` and may be shared
/// across planning threads; the only mutable state lives behind the control
/// handles of individual scorers.
#[derive(Debug)]
pub struct ScoringEngine {
    scorers: Vec<ConfiguredScorer>,
    adjust_edges: HashMap<String, AdjustEdgesHandle>,
    costmaps: HashMap<String, CostmapHandle>,
}

impl ScoringEngine {
    /// Build every scorer named in `config.edge_cost_functions`, in order.
    ///
    /// Fails when a name cannot be resolved to a cost model, when a scorer's
    /// options are invalid, or when a name is listed twice.
    pub fn new(config: &ScoringConfig) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::new();
        let mut handles = ScorerHandles::default();
        let mut scorers = Vec::with_capacity(config.edge_cost_functions.len());

        for name in &config.edge_cost_functions {
            if !seen.insert(name.as_str()) {
                return Err(Error::invalid(format!(
                    "edge scorer {} is listed more than once",
                    name
                )));
            }

            let table = config.scorer(name);
            let scorer = build_scorer(name, &table, &mut handles)?;
            debug!(
                scorer = %name,
                kind = %scorer.kind(),
                weight = table.weight,
                "configured edge scorer"
            );

            scorers.push(ConfiguredScorer {
                name: name.clone(),
                weight: table.weight,
                scorer,
            });
        }

        info!(count = scorers.len(), "edge scoring engine configured");

        Ok(Self {
            scorers,
            adjust_edges: handles.adjust_edges,
            costmaps: handles.costmaps,
        })
    }

    /// Score an edge with every configured scorer.
    pub fn score(&self, edge: &DirectionalEdge<'_>) -> ScoreResult {
        let mut total = 0.0;
        for configured in &self.scorers {
            match configured.scorer.score(edge) {
                Some(cost) => total += configured.weight * cost,
                None => {
                    debug!(
                        edge = edge.id,
                        scorer = %configured.name,
                        "edge rejected as not traversable"
                    );
                    return ScoreResult::not_traversable();
                }
            }
        }
        ScoreResult::with_cost(total)
    }

    /// Number of active scorers.
    pub fn num_plugins(&self) -> usize {
        self.scorers.len()
    }

    /// Configured scorer names, in evaluation order.
    pub fn scorer_names(&self) -> Vec<&str> {
        self.scorers.iter().map(|s| s.name.as_str()).collect()
    }

    /// Kinds of the configured scorers, in evaluation order.
    pub fn scorer_kinds(&self) -> Vec<ScorerKind> {
        self.scorers.iter().map(|s| s.scorer.kind()).collect()
    }

    /// Control handle of the dynamic adjustment scorer configured as `name`.
    pub fn adjust_edges_handle(&self, name: &str) -> Option<AdjustEdgesHandle> {
        self.adjust_edges.get(name).cloned()
    }

    /// Raster feed of the costmap scorer configured as `name`.
    pub fn costmap_handle(&self, name: &str) -> Option<CostmapHandle> {
        self.costmaps.get(name).cloned()
    }

    /// Publish one raster to every configured costmap scorer.
    pub fn publish_costmap(&self, costmap: Costmap) {
        let shared = Arc::new(costmap);
        for handle in self.costmaps.values() {
            handle.replace(Arc::clone(&shared));
        }
    }
}
