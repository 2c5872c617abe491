//! Scorer trait and construction of scorers by name.

use std::collections::HashMap;
use std::fmt;

use crate::config::ScorerConfig;
use crate::costmap::CostmapHandle;
use crate::error::{Error, Result};
use crate::graph::DirectionalEdge;

use super::adjust_edges::{AdjustEdgesHandle, AdjustEdgesScorer};
use super::costmap::CostmapScorer;
use super::distance::DistanceScorer;
use super::penalty::PenaltyScorer;
use super::semantic::SemanticScorer;
use super::time::TimeScorer;

/// Capability shared by all edge cost models.
///
/// Implementations must be callable concurrently from several planning
/// threads.
pub trait EdgeScorer: Send + Sync {
    /// The cost model this scorer implements.
    fn kind(&self) -> ScorerKind;

    /// Raw, unweighted cost of traversing `edge`.
    ///
    /// Returns `None` when the edge must not be traversed.
    fn score(&self, edge: &DirectionalEdge<'_>) -> Option<f64>;
}

/// Available cost models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScorerKind {
    Distance,
    Penalty,
    Time,
    Semantic,
    Costmap,
    AdjustEdges,
}

impl ScorerKind {
    pub const ALL: [ScorerKind; 6] = [
        ScorerKind::Distance,
        ScorerKind::Penalty,
        ScorerKind::Time,
        ScorerKind::Semantic,
        ScorerKind::Costmap,
        ScorerKind::AdjustEdges,
    ];

    /// Plugin name used in configuration files.
    pub fn plugin_name(self) -> &'static str {
        match self {
            ScorerKind::Distance => "DistanceScorer",
            ScorerKind::Penalty => "PenaltyScorer",
            ScorerKind::Time => "TimeScorer",
            ScorerKind::Semantic => "SemanticScorer",
            ScorerKind::Costmap => "CostmapScorer",
            ScorerKind::AdjustEdges => "AdjustEdgesScorer",
        }
    }

    /// Resolve a plugin name. A namespace prefix such as `routescore::` is ignored.
    pub fn from_plugin_name(plugin: &str) -> Option<Self> {
        let bare = plugin.rsplit("::").next().unwrap_or(plugin);
        Self::ALL
            .into_iter()
            .find(|kind| kind.plugin_name() == bare)
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plugin_name())
    }
}

/// Control surfaces collected while building scorers, keyed by scorer name.
#[derive(Debug, Default)]
pub(crate) struct ScorerHandles {
    pub(crate) adjust_edges: HashMap<String, AdjustEdgesHandle>,
    pub(crate) costmaps: HashMap<String, CostmapHandle>,
}

/// Instantiate the scorer configured as `name`.
pub(crate) fn build_scorer(
    name: &str,
    config: &ScorerConfig,
    handles: &mut ScorerHandles,
) -> Result<Box<dyn EdgeScorer>> {
    let plugin = config.plugin.as_deref().unwrap_or(name);
    let kind = ScorerKind::from_plugin_name(plugin).ok_or_else(|| Error::UnknownScorer {
        name: name.to_string(),
        plugin: plugin.to_string(),
        known: ScorerKind::ALL.iter().map(|k| k.plugin_name()).collect(),
    })?;

    let scorer: Box<dyn EdgeScorer> = match kind {
        ScorerKind::Distance => Box::new(DistanceScorer::new(config.options(name)?)),
        ScorerKind::Penalty => Box::new(PenaltyScorer::new(config.options(name)?)),
        ScorerKind::Time => Box::new(TimeScorer::new(config.options(name)?)?),
        ScorerKind::Semantic => Box::new(SemanticScorer::new(config.options(name)?)),
        ScorerKind::Costmap => {
            let scorer = CostmapScorer::new(config.options(name)?);
            handles
                .costmaps
                .insert(name.to_string(), scorer.costmap_handle());
            Box::new(scorer)
        }
        ScorerKind::AdjustEdges => {
            // Takes no options.
            config.options::<super::adjust_edges::AdjustEdgesOptions>(name)?;
            let scorer = AdjustEdgesScorer::new();
            handles.adjust_edges.insert(name.to_string(), scorer.handle());
            Box::new(scorer)
        }
    };

    Ok(scorer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_plain_and_namespaced_names() {
        assert_eq!(
            ScorerKind::from_plugin_name("TimeScorer"),
            Some(ScorerKind::Time)
        );
        assert_eq!(
            ScorerKind::from_plugin_name("routescore::CostmapScorer"),
            Some(ScorerKind::Costmap)
        );
        assert_eq!(ScorerKind::from_plugin_name("FakePluginPath"), None);
    }

    #[test]
    fn unknown_plugin_is_a_configuration_error() {
        let mut handles = ScorerHandles::default();
        let config = ScorerConfig::plugin("FakePluginPath");
        let err = build_scorer("FakeScorer", &config, &mut handles)
            .err()
            .expect("fake plugin does not resolve");
        assert!(matches!(err, Error::UnknownScorer { .. }));
    }

    #[test]
    fn control_handles_are_registered_by_name() {
        let mut handles = ScorerHandles::default();
        assert!(build_scorer(
            "Closures",
            &ScorerConfig::plugin("AdjustEdgesScorer"),
            &mut handles,
        )
        .is_ok());
        assert!(build_scorer(
            "Hazards",
            &ScorerConfig::plugin("CostmapScorer"),
            &mut handles,
        )
        .is_ok());

        assert!(handles.adjust_edges.contains_key("Closures"));
        assert!(handles.costmaps.contains_key("Hazards"));
    }

    #[test]
    fn rejects_unknown_options() {
        let mut handles = ScorerHandles::default();
        let config = ScorerConfig::plugin("CostmapScorer").with_option("use_maximun", true);
        let err = build_scorer("CostmapScorer", &config, &mut handles)
            .err()
            .expect("typo in option name");
        assert!(matches!(err, Error::InvalidScorerOptions { .. }));
    }
}
