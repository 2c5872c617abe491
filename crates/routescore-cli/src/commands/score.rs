//! Score command handler: evaluate one edge against the configured scorers.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use routescore_lib::{
    AdjustEdgesRequest, Coordinates, DirectionalEdge, EdgeAdjustment, EdgeId, Metadata,
    MetadataValue, Node, PlanningBudget, RouteConfig, ScorerKind, ScoringEngine,
};

use crate::input::load_costmap;
use crate::output::{emit, format_cost, OutputFormat, Render};

/// Edge and control inputs for a single scoring run.
#[derive(Debug, Clone, Default)]
pub struct ScoreRequest {
    pub edge_id: EdgeId,
    pub from: Coordinates,
    pub to: Coordinates,
    pub edge_metadata: Vec<(String, MetadataValue)>,
    pub end_metadata: Vec<(String, MetadataValue)>,
    pub closed_edges: Vec<EdgeId>,
    pub adjustments: Vec<EdgeAdjustment>,
    pub costmap: Option<PathBuf>,
}

/// Outcome of scoring the edge.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub edge_id: EdgeId,
    pub length: f64,
    pub traversable: bool,
    /// `None` when the edge is not traversable.
    pub cost: Option<f64>,
    pub scorers: Vec<String>,
}

impl Render for ScoreReport {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
        match self.cost {
            Some(cost) => writeln!(
                out,
                "Edge {} ({} m): cost {}",
                self.edge_id,
                format_cost(self.length),
                format_cost(cost)
            )?,
            None => writeln!(
                out,
                "Edge {} ({} m): not traversable",
                self.edge_id,
                format_cost(self.length)
            )?,
        }
        writeln!(out, "Scorers: {}", self.scorers.join(", "))
    }
}

fn metadata_from(entries: &[(String, MetadataValue)]) -> Metadata {
    entries
        .iter()
        .fold(Metadata::new(), |metadata, (key, value)| {
            metadata.with(key.clone(), value.clone())
        })
}

/// Push control inputs into every dynamic adjustment scorer.
fn apply_adjustments(engine: &ScoringEngine, request: &ScoreRequest) -> Result<()> {
    if request.closed_edges.is_empty() && request.adjustments.is_empty() {
        return Ok(());
    }

    let handles: Vec<_> = engine
        .scorer_names()
        .into_iter()
        .zip(engine.scorer_kinds())
        .filter(|(_, kind)| *kind == ScorerKind::AdjustEdges)
        .filter_map(|(name, _)| engine.adjust_edges_handle(name))
        .collect();
    if handles.is_empty() {
        bail!("edge closures or cost overrides need an AdjustEdgesScorer in edge_cost_functions");
    }

    let adjust = AdjustEdgesRequest {
        closed_edges: request.closed_edges.clone(),
        opened_edges: Vec::new(),
        adjust_edges: request.adjustments.clone(),
    };
    for handle in handles {
        if !handle.handle_request(&adjust).success {
            bail!("edge adjustment rejected: costs must be finite and non-negative");
        }
    }
    Ok(())
}

/// Score the requested edge.
pub fn run_score(config: &RouteConfig, request: &ScoreRequest) -> Result<ScoreReport> {
    let timer = PlanningBudget::from_config(config).start();
    let engine =
        ScoringEngine::new(&config.scoring).context("failed to build the scoring engine")?;

    if let Some(path) = &request.costmap {
        let costmap = load_costmap(path)?;
        if !engine.scorer_kinds().contains(&ScorerKind::Costmap) {
            warn!(path = %path.display(), "costmap given but no CostmapScorer is configured");
        }
        engine.publish_costmap(costmap);
    }

    apply_adjustments(&engine, request)?;

    let start = Node::new(0, request.from.x, request.from.y);
    let end = Node::new(1, request.to.x, request.to.y)
        .with_metadata(metadata_from(&request.end_metadata));
    let edge = DirectionalEdge::new(request.edge_id, &start, &end)
        .with_metadata(metadata_from(&request.edge_metadata));

    let result = engine.score(&edge);
    let elapsed = timer.finish();
    debug!(elapsed_ms = elapsed.as_millis() as u64, "scored edge");

    Ok(ScoreReport {
        edge_id: edge.id,
        length: edge.length(),
        traversable: result.is_traversable(),
        cost: result.cost(),
        scorers: engine
            .scorer_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// Handle the `score` subcommand.
pub fn handle_score(
    config: &RouteConfig,
    request: &ScoreRequest,
    format: OutputFormat,
) -> Result<()> {
    let report = run_score(config, request)?;
    emit(&report, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use routescore_lib::{ScorerConfig, ScoringConfig};

    fn request(from: (f64, f64), to: (f64, f64)) -> ScoreRequest {
        ScoreRequest {
            edge_id: 10,
            from: Coordinates::new(from.0, from.1),
            to: Coordinates::new(to.0, to.1),
            ..ScoreRequest::default()
        }
    }

    #[test]
    fn default_config_scores_length() {
        let report =
            run_score(&RouteConfig::default(), &request((0.0, 0.0), (3.0, 4.0))).expect("scores");
        assert!(report.traversable);
        assert_eq!(report.cost, Some(5.0));
        assert_eq!(report.length, 5.0);
    }

    #[test]
    fn closed_edge_is_not_traversable() {
        let mut req = request((0.0, 0.0), (1.0, 0.0));
        req.closed_edges = vec![10];
        let report = run_score(&RouteConfig::default(), &req).expect("scores");
        assert!(!report.traversable);
        assert_eq!(report.cost, None);
    }

    #[test]
    fn overrides_require_adjust_edges_scorer() {
        let config = RouteConfig {
            scoring: ScoringConfig::with_scorers(["DistanceScorer"]),
            ..RouteConfig::default()
        };
        let mut req = request((0.0, 0.0), (1.0, 0.0));
        req.adjustments = vec![EdgeAdjustment {
            edgeid: 10,
            cost: 3.0,
        }];
        assert!(run_score(&config, &req).is_err());
    }

    #[test]
    fn negative_override_is_rejected() {
        let mut req = request((0.0, 0.0), (1.0, 0.0));
        req.adjustments = vec![EdgeAdjustment {
            edgeid: 10,
            cost: -1.0,
        }];
        assert!(run_score(&RouteConfig::default(), &req).is_err());
    }

    #[test]
    fn metadata_reaches_scorers() {
        let config = RouteConfig {
            scoring: ScoringConfig::with_scorers(["PenaltyScorer"])
                .with_scorer("PenaltyScorer", ScorerConfig::plugin("PenaltyScorer")),
            ..RouteConfig::default()
        };
        let mut req = request((0.0, 0.0), (1.0, 0.0));
        req.edge_metadata = vec![("penalty".to_string(), MetadataValue::Integer(7))];
        let report = run_score(&config, &req).expect("scores");
        assert_eq!(report.cost, Some(7.0));
    }
}
