use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// Identifier of a graph node.
pub type NodeId = u32;

/// Identifier of a directional edge.
pub type EdgeId = u32;

/// Planar coordinates in the route frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Graph node. Owned by the graph and borrowed by edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub coords: Coordinates,
    pub metadata: Metadata,
}

impl Node {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self {
            id,
            coords: Coordinates::new(x, y),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Directed connection between two nodes.
///
/// The reverse direction is a distinct edge with its own identifier and
/// metadata, so costs may differ per direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalEdge<'g> {
    pub id: EdgeId,
    pub start: &'g Node,
    pub end: &'g Node,
    pub metadata: Metadata,
}

impl<'g> DirectionalEdge<'g> {
    pub fn new(id: EdgeId, start: &'g Node, end: &'g Node) -> Self {
        Self {
            id,
            start,
            end,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Straight-line length between the endpoints.
    pub fn length(&self) -> f64 {
        self.start.coords.distance_to(&self.end.coords)
    }
}

/// Accepted route through the graph.
#[derive(Debug, Clone)]
pub struct Route<'g> {
    pub start_node: &'g Node,
    pub edges: Vec<&'g DirectionalEdge<'g>>,
}

impl<'g> Route<'g> {
    /// A route that never leaves its start node.
    pub fn single_node(start_node: &'g Node) -> Self {
        Self {
            start_node,
            edges: Vec::new(),
        }
    }

    pub fn new(start_node: &'g Node, edges: Vec<&'g DirectionalEdge<'g>>) -> Self {
        Self { start_node, edges }
    }

    /// Node the route finishes on.
    pub fn end_node(&self) -> &'g Node {
        self.edges
            .last()
            .map(|edge| edge.end)
            .unwrap_or(self.start_node)
    }

    /// Sum of the straight-line lengths of all edges.
    pub fn length(&self) -> f64 {
        self.edges.iter().map(|edge| edge.length()).sum()
    }
}

/// Progress along a previously planned edge, used to resume path generation.
#[derive(Debug, Clone, Default)]
pub struct ReroutingState<'g> {
    /// Edge currently being followed, if any.
    pub curr_edge: Option<&'g DirectionalEdge<'g>>,
    /// Closest point on `curr_edge` to the current position.
    pub closest_pt_on_edge: Coordinates,
}

impl<'g> ReroutingState<'g> {
    pub fn on_edge(edge: &'g DirectionalEdge<'g>, closest_pt_on_edge: Coordinates) -> Self {
        Self {
            curr_edge: Some(edge),
            closest_pt_on_edge,
        }
    }
}
