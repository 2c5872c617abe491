use serde::Deserialize;

use crate::error::{Error, Result};
use crate::graph::DirectionalEdge;

use super::scorer::{EdgeScorer, ScorerKind};

/// Options for [`TimeScorer`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeOptions {
    /// Edge metadata key holding a measured traversal time in seconds.
    pub time_tag: String,
    /// Edge metadata key holding an absolute speed limit in m/s.
    pub speed_tag: String,
    /// Speed assumed when the edge carries no speed limit, in m/s.
    pub max_vel: f64,
}

impl Default for TimeOptions {
    fn default() -> Self {
        Self {
            time_tag: "abs_time_taken".to_string(),
            speed_tag: "abs_speed_limit".to_string(),
            max_vel: 0.5,
        }
    }
}

/// Scores an edge by its expected traversal time.
///
/// A measured time on the edge wins over any estimate. Otherwise the time is
/// the edge length over the edge's speed limit, or over `max_vel` when no
/// limit is set.
#[derive(Debug, Clone)]
pub struct TimeScorer {
    options: TimeOptions,
}

impl TimeScorer {
    pub fn new(options: TimeOptions) -> Result<Self> {
        if !options.max_vel.is_finite() || options.max_vel <= 0.0 {
            return Err(Error::invalid(format!(
                "max_vel must be finite and positive, got {}",
                options.max_vel
            )));
        }
        Ok(Self { options })
    }
}

impl EdgeScorer for TimeScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Time
    }

    fn score(&self, edge: &DirectionalEdge<'_>) -> Option<f64> {
        if let Some(time_taken) = edge.metadata.get_f64(&self.options.time_tag) {
            return Some(time_taken);
        }

        let speed = edge
            .metadata
            .get_f64(&self.options.speed_tag)
            .filter(|speed| *speed > 0.0)
            .unwrap_or(self.options.max_vel);

        Some(edge.length() / speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_default_speed() {
        let options = TimeOptions {
            max_vel: 0.0,
            ..TimeOptions::default()
        };
        assert!(TimeScorer::new(options).is_err());
    }

    #[test]
    fn default_speed_is_half_metre_per_second() {
        assert_eq!(TimeOptions::default().max_vel, 0.5);
    }
}
