use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::warn;

use crate::graph::DirectionalEdge;
use crate::metadata::Metadata;

use super::scorer::{EdgeScorer, ScorerKind};

/// Options for [`SemanticScorer`].
///
/// Class weights sit next to the other options, keyed by class name:
///
/// ```json
/// {
///   "plugin": "SemanticScorer",
///   "semantic_classes": ["road", "grass"],
///   "road": 0.0,
///   "grass": 3.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SemanticOptions {
    /// Known class names.
    pub semantic_classes: Vec<String>,
    /// Metadata key whose value names the class. Empty means class names are
    /// themselves looked up as metadata keys.
    pub semantic_key: String,
    /// Weight of each class, keyed by class name.
    #[serde(flatten)]
    pub class_weights: HashMap<String, f64>,
}

impl Default for SemanticOptions {
    fn default() -> Self {
        Self {
            semantic_classes: Vec::new(),
            semantic_key: "class".to_string(),
            class_weights: HashMap::new(),
        }
    }
}

/// Scores an edge by the semantic classes of the edge and its end node.
///
/// Edge and end node are looked up independently and both contribute when
/// both match. Classes that are not configured contribute nothing.
#[derive(Debug, Clone)]
pub struct SemanticScorer {
    /// Ordered by class name so key-mode sums are reproducible.
    weights: BTreeMap<String, f64>,
    semantic_key: String,
}

impl SemanticScorer {
    pub fn new(options: SemanticOptions) -> Self {
        let mut weights = BTreeMap::new();
        for class in &options.semantic_classes {
            let weight = match options.class_weights.get(class) {
                Some(weight) => *weight,
                None => {
                    warn!(class = %class, "semantic class has no weight, using 0.0");
                    0.0
                }
            };
            weights.insert(class.clone(), weight);
        }

        for class in options.class_weights.keys() {
            if !weights.contains_key(class) {
                warn!(class = %class, "weight given for a class missing from semantic_classes");
            }
        }

        Self {
            weights,
            semantic_key: options.semantic_key,
        }
    }

    fn metadata_cost(&self, metadata: &Metadata) -> f64 {
        if self.semantic_key.is_empty() {
            self.weights
                .iter()
                .filter(|(class, _)| metadata.contains_key(class))
                .map(|(_, weight)| weight)
                .sum()
        } else {
            metadata
                .get_str(&self.semantic_key)
                .and_then(|class| self.weights.get(class))
                .copied()
                .unwrap_or(0.0)
        }
    }
}

impl EdgeScorer for SemanticScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Semantic
    }

    fn score(&self, edge: &DirectionalEdge<'_>) -> Option<f64> {
        Some(self.metadata_cost(&edge.metadata) + self.metadata_cost(&edge.end.metadata))
    }
}
