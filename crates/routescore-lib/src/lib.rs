//! Routescore library entry points.
//!
//! This crate scores directed edges of an already-loaded route graph through
//! an ordered set of pluggable cost models, and turns an accepted route into a
//! densely sampled path. Higher-level consumers (CLI, planners, control
//! channels) should only depend on the items exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod budget;
pub mod config;
pub mod costmap;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod path;
pub mod scoring;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use budget::{PlanningBudget, PlanningTimer};
pub use config::{RouteConfig, ScorerConfig, ScoringConfig};
pub use costmap::{Costmap, CostmapHandle};
pub use error::{Error, Result};
pub use graph::{Coordinates, DirectionalEdge, EdgeId, Node, NodeId, ReroutingState, Route};
pub use metadata::{Metadata, MetadataValue};
pub use path::{Path, PathConverter, PathHeader, MAX_POINTS_PER_SEGMENT};
pub use scoring::{
    AdjustEdgesHandle, AdjustEdgesRequest, AdjustEdgesResponse, EdgeAdjustment, EdgeScorer,
    ScoreResult, ScorerKind, ScoringEngine,
};
