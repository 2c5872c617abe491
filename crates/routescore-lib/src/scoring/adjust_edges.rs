//! Administrative edge closures and cost overrides.
//!
//! The [`AdjustEdgesScorer`] gates edges that an operator has closed and
//! substitutes operator-provided costs for others. Its state is an overlay
//! keyed by edge identifier; the graph's own metadata is never touched.
//!
//! Updates arrive through an [`AdjustEdgesHandle`], independently of planning.
//! One mutex guards both the closed set and the override table, so a score
//! call never sees half of an update.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::graph::{DirectionalEdge, EdgeId};

use super::scorer::{EdgeScorer, ScorerKind};

/// The scorer takes no options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AdjustEdgesOptions {}

/// Cost override for one edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeAdjustment {
    pub edgeid: EdgeId,
    pub cost: f64,
}

/// Control-channel request. Closures apply first, then reopenings, then cost
/// overrides.
///
/// Override costs must be finite and non-negative. A request carrying any
/// other cost is rejected as a whole: the response has `success: false` and
/// none of its closures, reopenings or overrides are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustEdgesRequest {
    pub closed_edges: Vec<EdgeId>,
    pub opened_edges: Vec<EdgeId>,
    pub adjust_edges: Vec<EdgeAdjustment>,
}

impl AdjustEdgesRequest {
    pub fn close(edges: impl IntoIterator<Item = EdgeId>) -> Self {
        Self {
            closed_edges: edges.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn open(edges: impl IntoIterator<Item = EdgeId>) -> Self {
        Self {
            opened_edges: edges.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_cost(mut self, edgeid: EdgeId, cost: f64) -> Self {
        self.adjust_edges.push(EdgeAdjustment { edgeid, cost });
        self
    }
}

/// Control-channel response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustEdgesResponse {
    pub success: bool,
}

#[derive(Debug, Default)]
struct EdgeOverlay {
    closed: HashSet<EdgeId>,
    costs: HashMap<EdgeId, f64>,
}

/// Shared handle onto an [`AdjustEdgesScorer`]'s overlay.
///
/// Identifiers are not checked against any graph; unknown ids are stored
/// like any other.
#[derive(Debug, Clone, Default)]
pub struct AdjustEdgesHandle {
    overlay: Arc<Mutex<EdgeOverlay>>,
}

impl AdjustEdgesHandle {
    fn lock(&self) -> MutexGuard<'_, EdgeOverlay> {
        self.overlay.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a control request atomically.
    ///
    /// A request carrying a non-finite or negative cost is rejected as a
    /// whole and leaves the overlay untouched.
    pub fn handle_request(&self, request: &AdjustEdgesRequest) -> AdjustEdgesResponse {
        if let Some(bad) = request
            .adjust_edges
            .iter()
            .find(|adjustment| !adjustment.cost.is_finite() || adjustment.cost < 0.0)
        {
            warn!(
                edge = bad.edgeid,
                cost = bad.cost,
                "rejecting edge adjustment with invalid cost"
            );
            return AdjustEdgesResponse { success: false };
        }

        let mut overlay = self.lock();
        overlay.closed.extend(request.closed_edges.iter().copied());
        for edge in &request.opened_edges {
            overlay.closed.remove(edge);
        }
        for adjustment in &request.adjust_edges {
            overlay.costs.insert(adjustment.edgeid, adjustment.cost);
        }

        info!(
            closed = request.closed_edges.len(),
            opened = request.opened_edges.len(),
            adjusted = request.adjust_edges.len(),
            total_closed = overlay.closed.len(),
            "updated edge adjustments"
        );

        AdjustEdgesResponse { success: true }
    }

    pub fn close_edges(&self, edges: impl IntoIterator<Item = EdgeId>) {
        self.lock().closed.extend(edges);
    }

    pub fn open_edges(&self, edges: impl IntoIterator<Item = EdgeId>) {
        let mut overlay = self.lock();
        for edge in edges {
            overlay.closed.remove(&edge);
        }
    }

    /// Drop the cost override of an edge, if any.
    pub fn clear_cost(&self, edge: EdgeId) -> Option<f64> {
        self.lock().costs.remove(&edge)
    }

    pub fn is_closed(&self, edge: EdgeId) -> bool {
        self.lock().closed.contains(&edge)
    }

    pub fn cost_override(&self, edge: EdgeId) -> Option<f64> {
        self.lock().costs.get(&edge).copied()
    }

    /// Closed edge identifiers, sorted.
    pub fn closed_edges(&self) -> Vec<EdgeId> {
        let mut closed: Vec<EdgeId> = self.lock().closed.iter().copied().collect();
        closed.sort_unstable();
        closed
    }

    fn evaluate(&self, edge: EdgeId) -> Option<f64> {
        let overlay = self.lock();
        if overlay.closed.contains(&edge) {
            return None;
        }
        Some(overlay.costs.get(&edge).copied().unwrap_or(0.0))
    }
}

/// Gates closed edges and applies cost overrides.
#[derive(Debug, Clone, Default)]
pub struct AdjustEdgesScorer {
    handle: AdjustEdgesHandle,
}

impl AdjustEdgesScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> AdjustEdgesHandle {
        self.handle.clone()
    }
}

impl EdgeScorer for AdjustEdgesScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::AdjustEdges
    }

    fn score(&self, edge: &DirectionalEdge<'_>) -> Option<f64> {
        self.handle.evaluate(edge.id)
    }
}
