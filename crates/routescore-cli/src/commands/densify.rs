//! Densify command handler: turn a polyline route into a dense path.

use std::io::{self, Write};

use anyhow::{bail, Result};
use chrono::Utc;
use tracing::debug;

use routescore_lib::{
    Coordinates, DirectionalEdge, Node, Path, PathConverter, PlanningBudget, ReroutingState,
    Route, RouteConfig,
};

use crate::output::{emit, OutputFormat, Render};

/// Inputs for a densify run.
#[derive(Debug, Clone, Default)]
pub struct DensifyRequest {
    /// Route nodes in travel order.
    pub points: Vec<Coordinates>,
    /// Closest point on the first leg when resuming along it.
    pub resume_from: Option<Coordinates>,
    pub density: Option<f64>,
    pub frame: Option<String>,
}

impl Render for Path {
    fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "Path in frame {} at {} ({} points):",
            self.header.frame_id,
            self.header.stamp.to_rfc3339(),
            self.poses.len()
        )?;
        for pose in &self.poses {
            writeln!(out, "{:.4} {:.4}", pose.x, pose.y)?;
        }
        Ok(())
    }
}

/// Densify the requested route.
///
/// With `resume_from`, the first leg is the edge being followed: the path
/// starts at that point and the route itself begins at the leg's end.
pub fn run_densify(config: &RouteConfig, request: &DensifyRequest) -> Result<Path> {
    if request.points.is_empty() {
        bail!("at least one --point is required");
    }
    if request.resume_from.is_some() && request.points.len() < 2 {
        bail!("--resume-from needs at least two points to define the current edge");
    }

    let timer = PlanningBudget::from_config(config).start();
    let converter = PathConverter::new(request.density.unwrap_or(config.path_density))?;
    let frame = request.frame.as_deref().unwrap_or(&config.route_frame);

    let nodes: Vec<Node> = request
        .points
        .iter()
        .enumerate()
        .map(|(index, point)| Node::new(index as u32, point.x, point.y))
        .collect();
    let edges: Vec<DirectionalEdge<'_>> = nodes
        .windows(2)
        .enumerate()
        .map(|(index, pair)| DirectionalEdge::new(index as u32, &pair[0], &pair[1]))
        .collect();

    let (route, rerouting) = match request.resume_from {
        Some(closest) => (
            Route::new(&nodes[1], edges.iter().skip(1).collect()),
            ReroutingState::on_edge(&edges[0], closest),
        ),
        None => (
            Route::new(&nodes[0], edges.iter().collect()),
            ReroutingState::default(),
        ),
    };

    let path = converter.densify(&route, &rerouting, frame, Utc::now());
    let elapsed = timer.finish();
    debug!(
        points = path.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "densified route"
    );
    Ok(path)
}

/// Handle the `densify` subcommand.
pub fn handle_densify(
    config: &RouteConfig,
    request: &DensifyRequest,
    format: OutputFormat,
) -> Result<()> {
    let path = run_densify(config, request)?;
    emit(&path, format)
}
