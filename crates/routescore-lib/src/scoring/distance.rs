use serde::Deserialize;

use crate::graph::DirectionalEdge;

use super::scorer::{EdgeScorer, ScorerKind};

/// Options for [`DistanceScorer`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DistanceOptions {
    /// Edge metadata key holding a speed limit that divides the length.
    pub speed_tag: String,
}

impl Default for DistanceOptions {
    fn default() -> Self {
        Self {
            speed_tag: "speed_limit".to_string(),
        }
    }
}

/// Scores an edge by its straight-line length.
///
/// A positive speed limit in the edge metadata turns the length into
/// `length / speed_limit`, favouring faster edges of equal length.
#[derive(Debug, Clone, Default)]
pub struct DistanceScorer {
    options: DistanceOptions,
}

impl DistanceScorer {
    pub fn new(options: DistanceOptions) -> Self {
        Self { options }
    }
}

impl EdgeScorer for DistanceScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Distance
    }

    fn score(&self, edge: &DirectionalEdge<'_>) -> Option<f64> {
        let length = edge.length();
        match edge.metadata.get_f64(&self.options.speed_tag) {
            Some(speed_limit) if speed_limit > 0.0 => Some(length / speed_limit),
            _ => Some(length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use crate::metadata::Metadata;
    use crate::test_helpers::approx_eq;

    #[test]
    fn zero_length_edge_costs_nothing() {
        let a = Node::new(1, 0.0, 0.0);
        let b = Node::new(2, 0.0, 0.0);
        let edge = DirectionalEdge::new(10, &a, &b);
        assert_eq!(DistanceScorer::default().score(&edge), Some(0.0));
    }

    #[test]
    fn speed_limit_divides_length() {
        let a = Node::new(1, 1.0, 0.0);
        let b = Node::new(2, 0.0, 0.0);
        let edge =
            DirectionalEdge::new(10, &a, &b).with_metadata(Metadata::new().with("speed_limit", 0.8));
        let cost = DistanceScorer::default().score(&edge).expect("traversable");
        assert!(approx_eq(cost, 1.25));
    }

    #[test]
    fn non_positive_speed_limit_is_ignored() {
        let a = Node::new(1, 2.0, 0.0);
        let b = Node::new(2, 0.0, 0.0);
        let edge =
            DirectionalEdge::new(10, &a, &b).with_metadata(Metadata::new().with("speed_limit", 0.0));
        assert_eq!(DistanceScorer::default().score(&edge), Some(2.0));
    }

    #[test]
    fn custom_speed_tag() {
        let a = Node::new(1, 4.0, 0.0);
        let b = Node::new(2, 0.0, 0.0);
        let edge =
            DirectionalEdge::new(10, &a, &b).with_metadata(Metadata::new().with("vmax", 2.0));
        let scorer = DistanceScorer::new(DistanceOptions {
            speed_tag: "vmax".to_string(),
        });
        assert_eq!(scorer.score(&edge), Some(2.0));
    }
}
