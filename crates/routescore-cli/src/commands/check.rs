//! Check command handler: validate a configuration and list its scorers.

use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use routescore_lib::{PathConverter, PlanningBudget, RouteConfig, ScoringEngine};

use crate::output::{emit, OutputFormat, Render};

/// One configured scorer, in evaluation order.
#[derive(Debug, Serialize)]
pub struct ScorerSummary {
    pub name: String,
    pub plugin: String,
    pub weight: f64,
}

/// Resolved configuration.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub route_frame: String,
    pub path_density: f64,
    /// `None` when the planning budget is disabled.
    pub max_planning_time: Option<f64>,
    pub scorers: Vec<ScorerSummary>,
}

impl CheckReport {
    /// Build every component the configuration describes.
    pub fn from_config(config: &RouteConfig) -> Result<Self> {
        let engine =
            ScoringEngine::new(&config.scoring).context("failed to build the scoring engine")?;
        let converter = PathConverter::from_config(config)?;
        let budget = PlanningBudget::from_config(config);

        let scorers = engine
            .scorer_names()
            .into_iter()
            .zip(engine.scorer_kinds())
            .map(|(name, kind)| ScorerSummary {
                name: name.to_string(),
                plugin: kind.plugin_name().to_string(),
                weight: config.scoring.scorer(name).weight,
            })
            .collect();

        Ok(Self {
            route_frame: config.route_frame.clone(),
            path_density: converter.density(),
            max_planning_time: budget.max_planning_time().map(|d| d.as_secs_f64()),
            scorers,
        })
    }
}

impl Render for CheckReport {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Configuration OK")?;
        writeln!(out, "  route frame:    {}", self.route_frame)?;
        writeln!(out, "  path density:   {} m", self.path_density)?;
        match self.max_planning_time {
            Some(seconds) => writeln!(out, "  planning budget: {} s", seconds)?,
            None => writeln!(out, "  planning budget: unlimited")?,
        }
        writeln!(out, "Edge scorers ({}):", self.scorers.len())?;
        for (index, scorer) in self.scorers.iter().enumerate() {
            writeln!(
                out,
                "  {}. {} ({}) weight {}",
                index + 1,
                scorer.name,
                scorer.plugin,
                scorer.weight
            )?;
        }
        Ok(())
    }
}

/// Handle the `check` subcommand.
pub fn handle_check(config: &RouteConfig, format: OutputFormat) -> Result<()> {
    let report = CheckReport::from_config(config)?;
    emit(&report, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_lists_two_scorers() {
        let report = CheckReport::from_config(&RouteConfig::default()).expect("defaults valid");
        assert_eq!(report.route_frame, "map");
        assert_eq!(report.max_planning_time, Some(2.0));
        let plugins: Vec<_> = report.scorers.iter().map(|s| s.plugin.as_str()).collect();
        assert_eq!(plugins, vec!["DistanceScorer", "AdjustEdgesScorer"]);
    }

    #[test]
    fn text_report_numbers_scorers() {
        let report = CheckReport::from_config(&RouteConfig::default()).expect("defaults valid");
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("write to buffer");
        let text = String::from_utf8(buffer).expect("utf8");
        assert!(text.contains("1. DistanceScorer (DistanceScorer) weight 1"));
        assert!(text.contains("2. AdjustEdgesScorer"));
    }
}
