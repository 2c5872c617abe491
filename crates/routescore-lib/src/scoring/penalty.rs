use serde::Deserialize;

use crate::graph::DirectionalEdge;

use super::scorer::{EdgeScorer, ScorerKind};

/// Options for [`PenaltyScorer`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PenaltyOptions {
    /// Edge metadata key holding the penalty.
    pub penalty_tag: String,
}

impl Default for PenaltyOptions {
    fn default() -> Self {
        Self {
            penalty_tag: "penalty".to_string(),
        }
    }
}

/// Adds a fixed, externally computed penalty stored on the edge.
#[derive(Debug, Clone, Default)]
pub struct PenaltyScorer {
    options: PenaltyOptions,
}

impl PenaltyScorer {
    pub fn new(options: PenaltyOptions) -> Self {
        Self { options }
    }
}

impl EdgeScorer for PenaltyScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Penalty
    }

    fn score(&self, edge: &DirectionalEdge<'_>) -> Option<f64> {
        Some(
            edge.metadata
                .get_f64(&self.options.penalty_tag)
                .unwrap_or(0.0),
        )
    }
}
