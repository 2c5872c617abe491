use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RouteConfig;
use crate::error::{Error, Result};
use crate::graph::{Coordinates, ReroutingState, Route};

/// Upper bound on the points emitted for a single route segment.
pub const MAX_POINTS_PER_SEGMENT: usize = 100_000;

/// Frame and time a path was produced for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathHeader {
    pub frame_id: String,
    pub stamp: DateTime<Utc>,
}

/// Densely sampled path along a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub header: PathHeader,
    pub poses: Vec<Coordinates>,
}

impl Path {
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

/// Turns routes into evenly spaced point sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathConverter {
    density: f64,
}

impl PathConverter {
    /// Converter emitting a point every `density` metres.
    pub fn new(density: f64) -> Result<Self> {
        if !density.is_finite() || density <= 0.0 {
            return Err(Error::invalid(format!(
                "path_density must be finite and positive, got {}",
                density
            )));
        }
        Ok(Self { density })
    }

    pub fn from_config(config: &RouteConfig) -> Result<Self> {
        Self::new(config.path_density)
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Sample `route` into a path.
    ///
    /// When `rerouting` holds a partially followed edge, the path first runs
    /// from the stored closest point to that edge's end, so progress along
    /// the edge is kept. The final route node is always the last point; an
    /// edgeless route yields just its start node.
    pub fn densify(
        &self,
        route: &Route<'_>,
        rerouting: &ReroutingState<'_>,
        frame: &str,
        stamp: DateTime<Utc>,
    ) -> Path {
        let mut poses = Vec::new();

        if let Some(edge) = rerouting.curr_edge {
            self.interpolate(&rerouting.closest_pt_on_edge, &edge.end.coords, &mut poses);
        }

        for edge in &route.edges {
            self.interpolate(&edge.start.coords, &edge.end.coords, &mut poses);
        }

        poses.push(route.end_node().coords);

        debug!(
            edges = route.edges.len(),
            points = poses.len(),
            resumed = rerouting.curr_edge.is_some(),
            "densified route"
        );

        Path {
            header: PathHeader {
                frame_id: frame.to_string(),
                stamp,
            },
            poses,
        }
    }

    /// Append evenly spaced points from `start` towards `end`, excluding `end`.
    ///
    /// At most [`MAX_POINTS_PER_SEGMENT`] points are emitted; longer segments
    /// are sampled more coarsely.
    fn interpolate(&self, start: &Coordinates, end: &Coordinates, poses: &mut Vec<Coordinates>) {
        let length = start.distance_to(end);

        poses.push(*start);
        if length == 0.0 || !length.is_finite() {
            return;
        }

        let wanted = (length / self.density).ceil().max(1.0);
        let count = if wanted > MAX_POINTS_PER_SEGMENT as f64 {
            warn!(
                length,
                density = self.density,
                max_points = MAX_POINTS_PER_SEGMENT,
                "segment needs too many points, sampling more coarsely"
            );
            MAX_POINTS_PER_SEGMENT
        } else {
            wanted as usize
        };
        let step = length / count as f64;

        let ux = (end.x - start.x) / length;
        let uy = (end.y - start.y) / length;
        for i in 1..count {
            let travelled = step * i as f64;
            poses.push(Coordinates::new(
                start.x + ux * travelled,
                start.y + uy * travelled,
            ));
        }
    }
}
